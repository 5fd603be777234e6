use std::net::SocketAddr;

use anyhow::Context;
use log::info;
use warp::Filter;

mod endpoints;
mod statics;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let addr: SocketAddr = statics::BIND
        .parse()
        .with_context(|| format!("DRAWER_BIND `{}` is not a socket address", *statics::BIND))?;
    info!("serving host page on http://{addr}/ with frontend from {}", *statics::DIST);

    let (sendkill, kill) = tokio::sync::oneshot::channel::<()>();
    let (addr, server) = warp::serve(endpoints::host_endpoints().with(warp::log("drawer")))
        .try_bind_with_graceful_shutdown(addr, async {
            let _ = kill.await;
            info!("shutting down warp server");
        })
        .context("failed to bind dev server")?;
    let server = tokio::spawn(server);
    info!("listening on {addr}");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    info!("received SIGINT");
    let _ = sendkill.send(());
    server.await?;
    Ok(())
}
