use async_trait::async_trait;

use crate::{
    config::Config,
    entities::{CreateOrderRequest, DeliveryRequest, LocationsData},
    error::{invalid_input_error, upstream_error, Error},
    external::{OrderService, PricingService},
};

#[derive(Clone, Debug)]
pub struct DispatchApi {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl DispatchApi {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            token: config.api_token.clone(),
        }
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

fn check_status(res: &reqwest::Response) -> Result<(), Error> {
    let status_code = res.status().as_u16();

    if status_code >= 400 && status_code < 500 {
        return Err(invalid_input_error());
    } else if !res.status().is_success() {
        return Err(upstream_error());
    }

    Ok(())
}

#[async_trait]
impl PricingService for DispatchApi {
    #[tracing::instrument(skip_all, fields(destinations = request.destinations.len()))]
    async fn calculate(&self, request: &DeliveryRequest) -> Result<LocationsData, Error> {
        let url = format!("{}/delivery/data", self.api_url);
        let destination = serde_json::to_string(&request.destinations)?;

        let res = self
            .authorize(self.client.get(url))
            .query(&[("destination", destination)])
            .query(&[("serviceType", request.service_type.name())])
            .send()
            .await?;

        check_status(&res)?;

        Ok(res.json().await?)
    }
}

#[async_trait]
impl OrderService for DispatchApi {
    #[tracing::instrument(skip_all, fields(destinations = request.destination.len()))]
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<(), Error> {
        let url = format!("{}/create/order", self.api_url);

        let res = self
            .authorize(self.client.post(url))
            .json(request)
            .send()
            .await?;

        check_status(&res)
    }
}
