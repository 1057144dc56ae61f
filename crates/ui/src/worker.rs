use std::{sync::mpsc, thread};

use egui::Context;
use prodstock_api::component::Component;
use prodstock_client::{ProductClient, ProductClientArgs};
use prodstock_core::signal::FunctionSignal;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{error, info};

use crate::state::{Command, Event};

/// Bridges the immediate-mode view to the async client: commands flow to
/// a dedicated runtime thread, events flow back and wake the UI.
pub struct Worker {
    commands: UnboundedSender<Command>,
    events: mpsc::Receiver<Event>,
}

impl Worker {
    pub fn spawn(args: ProductClientArgs, ctx: Context) -> Self {
        let (tx_command, rx_command) = unbounded_channel();
        let (tx_event, rx_event) = mpsc::channel();

        thread::spawn(move || loop_forever(args, rx_command, tx_event, ctx));

        Self {
            commands: tx_command,
            events: rx_event,
        }
    }

    pub fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            error!("the client worker is gone");
        }
    }

    pub fn poll(&self) -> Option<Event> {
        self.events.try_recv().ok()
    }
}

fn loop_forever(
    args: ProductClientArgs,
    commands: UnboundedReceiver<Command>,
    events: mpsc::Sender<Event>,
    ctx: Context,
) {
    info!("Starting client worker...");

    let runtime = match ::tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => {
            error!("failed to build the client runtime: {error}");
            return;
        }
    };

    runtime.block_on(try_loop_forever(args, commands, events, ctx))
}

async fn try_loop_forever(
    args: ProductClientArgs,
    mut commands: UnboundedReceiver<Command>,
    events: mpsc::Sender<Event>,
    ctx: Context,
) {
    let client = match ProductClient::try_new(args, &FunctionSignal::default()).await {
        Ok(client) => client,
        Err(error) => {
            let event = Event::LoadFailed(format!("Failed to reach the product API: {error}"));
            let _ = events.send(event);
            ctx.request_repaint();
            return;
        }
    };

    while let Some(command) = commands.recv().await {
        let event = handle(&client, command).await;
        if events.send(event).is_err() {
            break;
        }
        ctx.request_repaint();
    }
}

async fn handle(client: &ProductClient, command: Command) -> Event {
    match command {
        Command::Refresh => match client.list_products().await {
            Ok(products) => Event::Loaded(products),
            Err(error) => Event::LoadFailed(format!("Failed to load products: {error}")),
        },
        Command::Create(spec) => match client.create_product(&spec).await {
            Ok(product) => Event::Saved(product),
            Err(error) => Event::SaveFailed(format!("Failed to save product: {error}")),
        },
        Command::Update(prod_id, patch) => match client.update_product(prod_id, &patch).await {
            Ok(product) => Event::Saved(product),
            Err(error) => Event::SaveFailed(format!("Failed to save product: {error}")),
        },
        Command::Delete(prod_id) => match client.remove_product(prod_id).await {
            Ok(_) => Event::Deleted(prod_id),
            Err(error) => Event::DeleteFailed(format!("Failed to delete product: {error}")),
        },
    }
}
