use std::{
    panic,
    process::exit,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::{anyhow, Error, Result};
use tokio::time::sleep;
use tracing::{error, info};

#[derive(Clone, Debug, Default)]
pub struct FunctionSignal {
    is_erroneous: Arc<AtomicBool>,
    is_terminating: Arc<AtomicBool>,
}

impl FunctionSignal {
    pub fn trap_on_panic(self) -> Self {
        let default_hook = panic::take_hook();

        let signal = self.clone();
        panic::set_hook(Box::new(move |info| {
            default_hook(info);
            signal.terminate_on_panic()
        }));
        self
    }

    pub fn trap_on_sigint(&self) -> Result<()> {
        let signal = self.clone();
        ::ctrlc::set_handler(move || signal.terminate())
            .map_err(|error| anyhow!("failed to set SIGINT handler: {error}"))
    }

    pub fn terminate(&self) {
        info!("Gracefully shutting down...");
        self.is_terminating.store(true, Ordering::SeqCst)
    }

    pub fn terminate_on_panic(&self) {
        self.is_erroneous.store(true, Ordering::SeqCst);
        self.terminate()
    }

    pub async fn panic(&self, error: Error) -> ! {
        error!("{error}");
        self.terminate_on_panic();

        // let the tracer flush pending records before aborting
        sleep(Duration::from_millis(300)).await;
        exit(1)
    }

    pub fn is_terminating(&self) -> bool {
        self.is_terminating.load(Ordering::SeqCst)
    }

    pub async fn wait_to_terminate(&self) {
        while !self.is_terminating() {
            sleep(Duration::from_millis(100)).await;
        }
    }

    pub async fn exit(&self) -> ! {
        if self.is_erroneous.load(Ordering::SeqCst) {
            exit(1)
        } else {
            exit(0)
        }
    }
}
