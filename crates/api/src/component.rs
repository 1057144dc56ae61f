use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use prodstock_core::signal::FunctionSignal;
use tracing::{instrument, Level};

#[async_trait]
pub trait ComponentExt
where
    Self: Component,
    <Self as Component>::Args: Parser,
{
    #[instrument(level = Level::INFO, skip(signal))]
    async fn try_default(signal: &FunctionSignal) -> Result<Self>
    where
        Self: Sized,
    {
        let args = <Self as Component>::Args::try_parse()?;
        <Self as Component>::try_new(args, signal).await
    }
}

#[async_trait]
impl<T> ComponentExt for T
where
    Self: Component,
    <Self as Component>::Args: Parser,
{
}

#[async_trait]
pub trait Component {
    type Args;

    async fn try_new(args: <Self as Component>::Args, signal: &FunctionSignal) -> Result<Self>
    where
        Self: Sized;
}
