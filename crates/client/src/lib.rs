use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use clap::Parser;
use prodstock_api::{
    component::Component,
    message::Message,
    product::{Product, ProductId, ProductPatch, ProductSpec},
};
use prodstock_core::signal::FunctionSignal;
use reqwest::Method;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{instrument, Level};
use url::Url;

#[derive(Clone)]
pub struct ProductClient {
    args: ProductClientArgs,
    session: ::reqwest::Client,
}

#[async_trait]
impl Component for ProductClient {
    type Args = ProductClientArgs;

    async fn try_new(args: <Self as Component>::Args, _: &FunctionSignal) -> Result<Self> {
        Ok(Self {
            args,
            session: ::reqwest::ClientBuilder::new().build()?,
        })
    }
}

impl ProductClient {
    #[instrument(level = Level::INFO, skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        let request = RequestWithoutPayload {
            method: Method::GET,
            rel_url: "api/products",
            payload: None,
        };
        self.execute(request).await
    }

    #[instrument(level = Level::INFO, skip(self, spec))]
    pub async fn create_product(&self, spec: &ProductSpec) -> Result<Product> {
        let request = Request {
            method: Method::POST,
            rel_url: "api/products",
            payload: Some(spec),
        };
        self.execute(request).await
    }

    #[instrument(level = Level::INFO, skip(self, patch))]
    pub async fn update_product(
        &self,
        prod_id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product> {
        let request = Request {
            method: Method::PUT,
            rel_url: &format!("api/products/{prod_id}"),
            payload: Some(patch),
        };
        self.execute(request).await
    }

    #[instrument(level = Level::INFO, skip(self))]
    pub async fn remove_product(&self, prod_id: ProductId) -> Result<Message> {
        let request = RequestWithoutPayload {
            method: Method::DELETE,
            rel_url: &format!("api/products/{prod_id}"),
            payload: None,
        };
        self.execute(request).await
    }

    async fn execute<T, R>(&self, request: Request<'_, T>) -> Result<R>
    where
        T: Serialize + Sync,
        R: DeserializeOwned,
    {
        let Request {
            method,
            rel_url,
            payload,
        } = request;

        let url = self.args.endpoint.join(rel_url)?;
        let mut request = match method.as_str() {
            "GET" => self.session.get(url),
            "DELETE" => self.session.delete(url),
            "POST" => self.session.post(url),
            "PUT" => self.session.put(url),
            _ => bail!("unsupported method: {method}"),
        };
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            response.json().await.map_err(Into::into)
        } else {
            let Message { message } = response
                .json()
                .await
                .unwrap_or_else(|_| Message::new(format!("unexpected status: {status}")));
            Err(anyhow!(message))
        }
    }
}

type RequestWithoutPayload<'a> = Request<'a, ()>;

struct Request<'a, T> {
    method: Method,
    rel_url: &'a str,
    payload: Option<&'a T>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Parser)]
#[clap(rename_all = "kebab-case")]
#[serde(rename_all = "camelCase")]
pub struct ProductClientArgs {
    #[arg(
        long,
        env = "PRODSTOCK_CLIENT_ENDPOINT",
        value_name = "URL",
        default_value = ProductClientArgs::default_endpoint_str(),
    )]
    #[serde(default = "ProductClientArgs::default_endpoint")]
    pub endpoint: Url,
}

impl Default for ProductClientArgs {
    fn default() -> Self {
        Self {
            endpoint: Self::default_endpoint(),
        }
    }
}

impl ProductClientArgs {
    const fn default_endpoint_str() -> &'static str {
        "http://localhost:5000/"
    }

    fn default_endpoint() -> Url {
        Self::default_endpoint_str().parse().unwrap()
    }
}
