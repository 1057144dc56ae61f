use anyhow::anyhow;
use prodstock_api::component::ComponentExt;
use prodstock_core::signal::FunctionSignal;
use prodstock_gateway::{actix, db::Database};
use tokio::{spawn, task::JoinHandle};
use tracing::{error, info};

#[::tokio::main]
async fn main() {
    ::prodstock_core::tracer::init_once();
    info!("Welcome to prodstock gateway!");

    let signal = FunctionSignal::default().trap_on_panic();
    if let Err(error) = signal.trap_on_sigint() {
        error!("{error}");
        return;
    }

    info!("Booting...");
    let db = match <Database as ComponentExt>::try_default(&signal).await {
        Ok(db) => db,
        Err(error) => {
            signal
                .panic(anyhow!("failed to init the product store: {error}"))
                .await
        }
    };

    info!("Registering gateway workers...");
    let handlers = spawn_workers(&db);

    info!("Ready");
    signal.wait_to_terminate().await;

    info!("Terminating...");
    for handler in handlers {
        handler.abort();
    }

    if let Err(error) = db.close().await {
        error!("{error}");
    }

    signal.exit().await
}

fn spawn_workers(db: &Database) -> Vec<JoinHandle<()>> {
    vec![spawn(actix::loop_forever(db.clone()))]
}
