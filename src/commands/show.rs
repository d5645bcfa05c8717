use anyhow::bail;

use crate::client::classify::{classify, FileKind};
use crate::client::{parse_page_ref, HttpClient};

pub async fn run(client: HttpClient, page: String, file: Option<String>) -> anyhow::Result<()> {
    let id = parse_page_ref(&page);
    let data = client.fetch_page(id).await?;

    if let Some(name) = file {
        let Some(entry) = data.files.iter().find(|entry| entry.name == name) else {
            bail!("no file named '{name}' on this page");
        };

        // inline preview for text files, a link for everything else
        match classify(&entry.name) {
            FileKind::Text => print!("{}", client.fetch_text(&entry.url).await?),
            _ => println!("{}", entry.url),
        }
        return Ok(());
    }

    if !data.content.is_empty() {
        println!("{}", data.content);
    }

    if !data.files.is_empty() {
        if !data.content.is_empty() {
            println!();
        }
        println!("files:");
        for entry in &data.files {
            println!(
                "  {} ({:.1} KB) {}",
                entry.name,
                entry.size as f64 / 1024.0,
                entry.url
            );
        }
    }

    Ok(())
}
