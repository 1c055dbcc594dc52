use crate::server::GENERIC_FAILURE;
use crate::wiring::AssistantFactory;
use anyhow::Result;
use chatskcet_common::Response;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn ask(factory: &AssistantFactory, query: &str, json: bool) -> Result<()> {
    let assistant = factory.assistant(None)?;
    let response = assistant.generate_response(query).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print!("{}", render(&response));
    }
    Ok(())
}

/// Line-oriented session. Each line is answered on its own, without history.
pub async fn chat(factory: &AssistantFactory) -> Result<()> {
    let assistant = factory.assistant(None)?;
    let name = &factory.config().assistant.name;
    println!("{}: {}", name, factory.config().assistant.greeting);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query.eq_ignore_ascii_case("exit") {
            break;
        }

        match assistant.generate_response(query).await {
            Ok(response) => print!("{name}: {}", render(&response)),
            Err(e) => {
                tracing::warn!(error = %e, "chat.turn.failed");
                println!("{name}: {GENERIC_FAILURE}");
            }
        }
    }
    Ok(())
}

/// Answer text followed by numbered references, if any.
pub fn render(response: &Response) -> String {
    let mut out = format!("{}\n", response.content.trim_end());
    if !response.references.is_empty() {
        out.push_str("\nReferences:\n");
        for (i, r) in response.references.iter().enumerate() {
            out.push_str(&format!("  [{}] {} <{}>\n", i + 1, r.title, r.url));
        }
    }
    out
}
