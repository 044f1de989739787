use crate::{render_to_file, Error, RenderConfig, RenderRequest, RenderResult, Result, Strategy};
use log::debug;
use std::sync::mpsc::{self, Sender};
use std::thread;
use tokio::sync::oneshot;

enum Command {
    Render(RenderRequest, oneshot::Sender<Result<RenderResult>>),
    Close(oneshot::Sender<Result<()>>),
}

/// An async-friendly renderer backed by a dedicated worker thread.
///
/// The worker thread builds and owns the `SvgRenderer` (which may hold
/// non-`Send` browser handles) and executes requests sent from async tasks one
/// at a time, in submission order.
#[derive(Clone)]
pub struct RenderWorker {
    cmd_tx: Sender<Command>,
}

impl RenderWorker {
    /// Spawn the worker thread and build the renderer for `strategy` on it.
    pub async fn spawn(strategy: Strategy, config: RenderConfig) -> Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx): (oneshot::Sender<Result<()>>, oneshot::Receiver<Result<()>>) =
            oneshot::channel();

        thread::Builder::new()
            .name(format!("svgshot-{:?}", strategy).to_lowercase())
            .spawn(move || {
                let renderer = match strategy.build(&config) {
                    Ok(r) => r,
                    Err(err) => {
                        let _ = init_tx.send(Err(err));
                        return;
                    }
                };
                let _ = init_tx.send(Ok(()));

                while let Ok(cmd) = cmd_rx.recv() {
                    match cmd {
                        Command::Render(request, resp) => {
                            let res = render_to_file(renderer.as_ref(), &request);
                            let _ = resp.send(res);
                        }
                        Command::Close(resp) => {
                            drop(renderer);
                            let _ = resp.send(Ok(()));
                            break;
                        }
                    }
                }
                debug!("render worker exiting");
            })
            .map_err(|e| Error::Other(format!("Failed to spawn render worker: {}", e)))?;

        // Wait for the worker to report whether the renderer could be built
        init_rx
            .await
            .map_err(|e| Error::Other(format!("Worker init canceled: {}", e)))??;

        Ok(Self { cmd_tx })
    }

    /// Render one request on the worker thread
    pub async fn render(&self, request: RenderRequest) -> Result<RenderResult> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Render(request, tx))
            .map_err(|_| Error::Other("Render worker has shut down".into()))?;
        rx.await
            .map_err(|e| Error::Other(format!("Render canceled: {}", e)))?
    }

    /// Shut the worker down, dropping its renderer.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Close(tx));
        rx.await
            .map_err(|e| Error::Other(format!("Close canceled: {}", e)))?
    }
}
