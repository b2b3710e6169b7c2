use crate::api::{ApiClient, ApiRequest, RequestBody, Transport, endpoints};
use crate::error::ApiError;
use crate::models::{LoginCredentials, SignupPayload};
use serde_json::Value;

impl<T: Transport> ApiClient<T> {
    /// Raw response body; pass it to `session::extract_token`.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<Value, ApiError> {
        let body = serde_json::to_value(credentials)?;
        self.call(ApiRequest::post(endpoints::LOGIN, RequestBody::Json(body)))
            .await
    }

    pub async fn signup(&self, payload: &SignupPayload) -> Result<Value, ApiError> {
        let body = serde_json::to_value(payload)?;
        self.call(ApiRequest::post(endpoints::SIGNUP, RequestBody::Json(body)))
            .await
    }

    pub async fn refresh(&self) -> Result<Value, ApiError> {
        self.call(ApiRequest::post(endpoints::REFRESH, RequestBody::Empty))
            .await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.call(ApiRequest::post(endpoints::LOGOUT, RequestBody::Empty))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::api::fake::FakeTransport;
    use crate::api::{ApiClient, RequestBody};
    use crate::models::{LoginCredentials, SignupPayload};
    use crate::session::extract_token;
    use serde_json::json;

    #[tokio::test]
    async fn login_posts_credentials() {
        let client = ApiClient::new(
            FakeTransport::new().respond("/login", 200, json!({"data": {"access_token": "t0k"}})),
        );

        let body = client
            .login(&LoginCredentials {
                phone: "+989123456789".into(),
                password: "hunter2".into(),
            })
            .await
            .unwrap();
        assert_eq!(extract_token(&body).as_deref(), Some("t0k"));

        let sent = client.transport().requests();
        assert_eq!(
            sent[0].body,
            RequestBody::Json(json!({"phone": "+989123456789", "password": "hunter2"}))
        );
    }

    #[tokio::test]
    async fn refresh_returns_the_new_token() {
        let client = ApiClient::new(
            FakeTransport::new().respond("/refresh", 200, json!({"token": "fresh"})),
        );

        let body = client.refresh().await.unwrap();
        assert_eq!(extract_token(&body).as_deref(), Some("fresh"));
        assert_eq!(client.transport().requests()[0].body, RequestBody::Empty);
    }

    #[tokio::test]
    async fn signup_rejection_surfaces_status() {
        let client = ApiClient::new(
            FakeTransport::new().respond("/signup", 409, json!({"detail": "phone taken"})),
        );

        let err = client
            .signup(&SignupPayload {
                phone: "+14155550100".into(),
                password: "pw".into(),
                name: "Ada".into(),
                organization: "Cafe".into(),
            })
            .await
            .unwrap_err();
        assert!(err.is_client_error());
    }
}
