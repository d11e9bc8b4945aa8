//! Brazilian postal code lookup (ViaCEP).

use async_trait::async_trait;
use serde::Deserialize;
use shopfront_commerce::checkout::{Address, AddressLookup, PostalCode};
use shopfront_commerce::CommerceError;

use crate::FetchClient;

/// Public ViaCEP endpoint.
pub const VIACEP_BASE_URL: &str = "https://viacep.com.br/ws";

/// Address record as ViaCEP returns it.
#[derive(Debug, Deserialize)]
struct ViaCepAddress {
    #[serde(default)]
    cep: String,
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    complemento: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
    /// `true` (or `"true"`) when the code does not exist.
    #[serde(default)]
    erro: Option<serde_json::Value>,
}

impl ViaCepAddress {
    fn is_error(&self) -> bool {
        match &self.erro {
            None | Some(serde_json::Value::Null) => false,
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(s)) => s != "false",
            Some(_) => true,
        }
    }

    fn into_address(self, code: &PostalCode) -> Address {
        Address {
            street: self.logradouro,
            complement: self.complemento,
            district: self.bairro,
            city: self.localidade,
            state: self.uf,
            postal_code: if self.cep.is_empty() {
                code.formatted()
            } else {
                self.cep
            },
        }
    }
}

/// Looks up addresses at `{base}/{digits}/json/`.
#[derive(Debug, Clone)]
pub struct ViaCepLookup {
    client: FetchClient,
    base_url: String,
}

impl ViaCepLookup {
    /// Create a lookup against `base_url` (normally [`VIACEP_BASE_URL`]).
    pub fn new(client: FetchClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl AddressLookup for ViaCepLookup {
    async fn lookup(&self, code: &PostalCode) -> Result<Address, CommerceError> {
        let url = format!(
            "{}/{}/json/",
            self.base_url.trim_end_matches('/'),
            code.digits()
        );
        let record: ViaCepAddress = self
            .client
            .get_json(&url)
            .await
            .map_err(|e| CommerceError::LookupFailed(e.to_string()))?;

        if record.is_error() {
            return Err(CommerceError::AddressNotFound(code.formatted()));
        }
        Ok(record.into_address(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::client;
    use shopfront_commerce::checkout::{ShippingEstimate, POSTAL_CODE_NOT_FOUND};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn paulista() -> serde_json::Value {
        serde_json::json!({
            "cep": "01310-100",
            "logradouro": "Avenida Paulista",
            "complemento": "de 612 a 1510 - lado par",
            "bairro": "Bela Vista",
            "localidade": "São Paulo",
            "uf": "SP",
            "ibge": "3550308"
        })
    }

    async fn server_with(status: u16, body: serde_json::Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ws/01310100/json/"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&server)
            .await;
        server
    }

    fn lookup(server: &MockServer) -> ViaCepLookup {
        ViaCepLookup::new(client(), format!("{}/ws", server.uri()))
    }

    #[tokio::test]
    async fn test_lookup_found() {
        let server = server_with(200, paulista()).await;
        let code = PostalCode::parse("01310-100").unwrap();

        let address = lookup(&server).lookup(&code).await.unwrap();
        assert_eq!(address.street, "Avenida Paulista");
        assert_eq!(address.city, "São Paulo");
        assert_eq!(address.state, "SP");
        assert_eq!(address.postal_code, "01310-100");
    }

    #[tokio::test]
    async fn test_lookup_error_flag_is_not_found() {
        let server = server_with(200, serde_json::json!({"erro": true})).await;
        let code = PostalCode::parse("01310100").unwrap();

        let err = lookup(&server).lookup(&code).await.unwrap_err();
        assert!(matches!(err, CommerceError::AddressNotFound(_)));
    }

    #[tokio::test]
    async fn test_lookup_bad_status_is_failure() {
        let server = server_with(400, serde_json::json!({})).await;
        let code = PostalCode::parse("01310100").unwrap();

        let err = lookup(&server).lookup(&code).await.unwrap_err();
        assert!(matches!(err, CommerceError::LookupFailed(_)));
    }

    #[tokio::test]
    async fn test_input_handler_against_endpoint() {
        let server = server_with(200, paulista()).await;
        let lookup = lookup(&server);
        let mut estimate = ShippingEstimate::new();

        assert!(!estimate.handle_input("0131010", &lookup).await);
        assert!(estimate.handle_input("01310100", &lookup).await);
        assert_eq!(estimate.address().unwrap().district, "Bela Vista");
    }

    #[tokio::test]
    async fn test_input_handler_not_found_clears_address() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ws/01310100/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(paulista()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ws/99999999/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"erro": "true"})))
            .mount(&server)
            .await;
        let lookup = lookup(&server);

        let mut estimate = ShippingEstimate::new();
        estimate.handle_input("01310100", &lookup).await;
        assert!(estimate.address().is_some());
        estimate.handle_input("99999-999", &lookup).await;
        assert!(estimate.address().is_none());
        assert_eq!(estimate.error(), Some(POSTAL_CODE_NOT_FOUND));
    }
}
