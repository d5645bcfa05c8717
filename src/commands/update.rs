use std::path::PathBuf;

use crate::client::session::{upload_all, UploadSession};
use crate::client::{parse_page_ref, HttpClient};

use super::{read_selection, report_outcomes, resolve_content};

pub async fn run(
    client: HttpClient,
    page: String,
    text: Option<String>,
    paths: Vec<PathBuf>,
) -> anyhow::Result<()> {
    let id = parse_page_ref(&page).to_owned();

    let content = resolve_content(text, !paths.is_empty())?;
    let selection = read_selection(&paths).await?;

    let mut session = UploadSession::new();
    upload_all(&mut session, &client, selection).await;
    report_outcomes(&session);

    client
        .update_page(&id, content, session.into_files())
        .await?;
    println!("updated {id}");

    Ok(())
}
