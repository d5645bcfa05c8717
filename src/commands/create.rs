use std::path::PathBuf;

use crate::client::session::{upload_all, UploadSession};
use crate::client::HttpClient;

use super::{read_selection, report_outcomes, resolve_content};

pub async fn run(
    client: HttpClient,
    text: Option<String>,
    paths: Vec<PathBuf>,
) -> anyhow::Result<()> {
    let content = resolve_content(text, !paths.is_empty())?;
    let selection = read_selection(&paths).await?;

    let mut session = UploadSession::new();
    upload_all(&mut session, &client, selection).await;
    report_outcomes(&session);

    let created = client.create_page(content, session.into_files()).await?;
    println!("{}", created.url);

    Ok(())
}
