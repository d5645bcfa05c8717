use tracing::info;

use crate::controllers::page;
use crate::App;

pub async fn run(mut app: App) -> anyhow::Result<()> {
    let count = page::purge_expired(&mut app).await?;
    info!("purge complete, {count} pages removed");
    Ok(())
}
