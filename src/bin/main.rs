use std::path::PathBuf;

use financial_research_client::{
    AgentClient, ChatSession, ClientConfig, MessageKind, export::export_transcript,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "financial_research_client=info,research_chat=info".into()),
        )
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = ClientConfig::from_env();
    info!("Research chat client");
    info!("Backend: {}", config.base_url);

    let client = AgentClient::new(&config);
    let mut session = ChatSession::new(client);

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(
            b"Type a ticker (e.g. RELIANCE.NS), \"analyze <TICKER>\", or any question.\n\
              Commands: /steps, /toggle <n>, /export <path>, /portfolio T1,T2,..., /sentiment <text>, /quit\n",
        )
        .await?;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim().to_string();

        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix('/') {
            if !handle_command(command, &mut session, &mut stdout).await? {
                break;
            }
            continue;
        }

        let before = session.conversation().message_count();
        match session.submit(&line).await {
            Ok(_) => print_new_messages(&session, before, &mut stdout).await?,
            Err(e) => {
                stdout
                    .write_all(format!("error: {}\n", e).as_bytes())
                    .await?;
            }
        }
    }

    Ok(())
}

/// Returns false when the session should end
async fn handle_command(
    command: &str,
    session: &mut ChatSession,
    stdout: &mut tokio::io::Stdout,
) -> Result<bool, Box<dyn std::error::Error>> {
    let (name, rest) = match command.split_once(' ') {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    match name {
        "quit" | "exit" => return Ok(false),

        "steps" => {
            let conversation = session.conversation();
            if conversation.steps().is_empty() {
                stdout.write_all(b"no steps recorded\n").await?;
            }
            let mut output = String::new();
            for (index, step) in conversation.steps().iter().enumerate() {
                let marker = if conversation.is_step_collapsed(index) {
                    "[+]"
                } else {
                    "[-]"
                };
                output.push_str(&format!(
                    "{} {}: {}\n",
                    marker,
                    step.step_type,
                    step.content.as_deref().unwrap_or("(chart)")
                ));
            }
            stdout.write_all(output.as_bytes()).await?;
        }

        "toggle" => match rest.parse::<usize>() {
            Ok(index) => session.conversation_mut().toggle_step(index),
            Err(_) => stdout.write_all(b"usage: /toggle <step-index>\n").await?,
        },

        "export" => {
            let path = if rest.is_empty() {
                PathBuf::from("transcript.pdf")
            } else {
                PathBuf::from(rest)
            };
            // Export failures are surfaced but never touch conversation state.
            match export_transcript(session.conversation(), &path).await {
                Ok(written) => {
                    stdout
                        .write_all(format!("exported to {}\n", written.display()).as_bytes())
                        .await?;
                }
                Err(e) => {
                    tracing::error!("Export failed: {}", e);
                    stdout
                        .write_all(format!("export failed: {}\n", e).as_bytes())
                        .await?;
                }
            }
        }

        "portfolio" => {
            let tickers: Vec<String> = rest
                .split(',')
                .map(|t| t.trim().to_uppercase())
                .filter(|t| !t.is_empty())
                .collect();
            if tickers.is_empty() {
                stdout.write_all(b"usage: /portfolio T1,T2,...\n").await?;
            } else {
                match session.client().portfolio(tickers, None).await {
                    Ok(body) => {
                        stdout
                            .write_all(format!("{:#}\n", body).as_bytes())
                            .await?;
                    }
                    Err(e) => {
                        stdout
                            .write_all(format!("error: {}\n", e).as_bytes())
                            .await?;
                    }
                }
            }
        }

        "sentiment" => {
            if rest.is_empty() {
                stdout.write_all(b"usage: /sentiment <text>\n").await?;
            } else {
                match session
                    .client()
                    .sentiment(vec![rest.to_string()], None)
                    .await
                {
                    Ok(body) => {
                        stdout
                            .write_all(format!("{:#}\n", body).as_bytes())
                            .await?;
                    }
                    Err(e) => {
                        stdout
                            .write_all(format!("error: {}\n", e).as_bytes())
                            .await?;
                    }
                }
            }
        }

        _ => {
            stdout
                .write_all(format!("unknown command: /{}\n", name).as_bytes())
                .await?;
        }
    }

    Ok(true)
}

/// Print messages appended since `from`, and the step list of a fresh run
async fn print_new_messages(
    session: &ChatSession,
    from: usize,
    stdout: &mut tokio::io::Stdout,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut output = String::new();

    for message in &session.conversation().messages()[from..] {
        match message.kind {
            MessageKind::User => {}
            MessageKind::Agent => output.push_str(&format!("agent: {}\n", message.content)),
            MessageKind::Error => output.push_str(&format!("error: {}\n", message.content)),
            MessageKind::Step => output.push_str(&format!(
                "[{}] {}\n",
                message.label.as_deref().unwrap_or("step"),
                message.content
            )),
        }
    }

    let steps = session.conversation().steps();
    if !steps.is_empty() {
        output.push_str(&format!(
            "({} reasoning steps recorded; /steps to list)\n",
            steps.len()
        ));
    }

    stdout.write_all(output.as_bytes()).await?;
    Ok(())
}
