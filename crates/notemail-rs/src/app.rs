//! Configuration loading and subcommand dispatch.

use crate::chat::run_chat;
use crate::cli::{Cli, CliCommand};
use crate::console::Console;
use crate::menu::run_menu;
use anyhow::{Context, bail};
use log::{debug, info};
use notemail_rs_config::{Credentials, LayeredConfigOptions, NotemailConfig};
use notemail_rs_core::MailServices;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Layered configuration for `cwd` with `runtime_paths` applied last.
pub fn load_config(runtime_paths: &[PathBuf], cwd: &Path) -> anyhow::Result<NotemailConfig> {
    let options = runtime_paths
        .iter()
        .fold(LayeredConfigOptions::new(cwd), |options, path| {
            options.with_runtime_path(path)
        });
    let layered = NotemailConfig::load_layered_with_options(options)
        .context("failed to load layered config")?;
    debug!("layered config loaded (layers={})", layered.layers.len());
    Ok(layered.config)
}

/// Run one subcommand against already-built services.
pub async fn run_command<R: BufRead, W: Write>(
    command: CliCommand,
    services: &MailServices,
    config: &NotemailConfig,
    cwd: &Path,
    console: &mut Console<R, W>,
) -> anyhow::Result<()> {
    info!("running command (command={command:?})");
    match command {
        CliCommand::Menu => run_menu(&services.mailbox, console).await?,
        CliCommand::Chat => {
            let interpreter = services
                .interpreter(&config.assistant, cwd)
                .context("chat mode needs a language model")?;
            debug!(
                "instructions resolved (source={:?})",
                interpreter.instructions().source
            );
            run_chat(&interpreter, console).await?;
        }
        CliCommand::Reindex => {
            let count = services
                .mailbox
                .reindex()
                .await
                .context("failed to reindex messages")?;
            console.say(format!(
                "Reindexed {count} messages into namespace '{}'.",
                services.mailbox.settings().namespace
            ))?;
        }
        CliCommand::Stats => {
            let stats = services
                .mailbox
                .stats()
                .await
                .context("failed to collect statistics")?;
            console.show(stats)?;
        }
        CliCommand::Doctor => {
            let report = services
                .mailbox
                .doctor()
                .await
                .context("failed to read the database schema")?;
            console.show(&report)?;
            if !report.is_valid() {
                bail!("database schema does not match the message schema");
            }
        }
    }
    Ok(())
}

/// Load configuration and credentials, build the clients, and run `cli`.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to resolve current working directory")?;
    let mut config = load_config(&cli.config, &cwd)?;
    let credentials = Credentials::from_env().context("missing credentials")?;
    credentials.apply_overrides(&mut config);
    info!(
        "starting notemail (command={:?}, vector_index={}, chat_model={})",
        cli.command(),
        credentials.vector.is_some(),
        credentials.assistant_key.is_some()
    );
    let services =
        MailServices::from_config(&config, &credentials).context("failed to build clients")?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut console = Console::new(stdin.lock(), stdout.lock());
    run_command(cli.command(), &services, &config, &cwd, &mut console).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use notemail_rs_core::{Mailbox, SemanticSettings};
    use notemail_rs_store::{PropertyKind, expected_schema};
    use notemail_rs_test_utils::{StubIndex, StubStore, stored_message};
    use notemail_rs_vector::VectorIndex;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;
    use std::sync::Arc;

    fn services(store: &StubStore, index: Option<&StubIndex>) -> MailServices {
        let mailbox = Mailbox::new(
            Arc::new(store.clone()),
            index.map(|index| Arc::new(index.clone()) as Arc<dyn VectorIndex>),
            SemanticSettings::default(),
        );
        MailServices::new(mailbox, None)
    }

    async fn run(
        command: CliCommand,
        services: &MailServices,
    ) -> (anyhow::Result<()>, String) {
        let cwd = tempfile::tempdir().expect("tempdir");
        let mut console = Console::new(Cursor::new(String::new()), Vec::new());
        let result = run_command(
            command,
            services,
            &NotemailConfig::default(),
            cwd.path(),
            &mut console,
        )
        .await;
        let output = String::from_utf8(console.into_output()).expect("utf8");
        (result, output)
    }

    #[test]
    fn runtime_layers_override_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("override.json5");
        std::fs::write(&path, "{ vector: { top_k: 5, namespace: 'archive' } }").expect("write");

        let config = load_config(&[path], dir.path()).expect("config");

        assert_eq!(config.vector.top_k, 5);
        assert_eq!(config.vector.namespace, "archive");
        assert_eq!(config.vector.overfetch_factor, 3);
    }

    #[test]
    fn missing_runtime_layer_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.json5");

        assert!(load_config(&[missing], dir.path()).is_err());
    }

    #[tokio::test]
    async fn reindex_reports_count() {
        let store = StubStore::with_messages(vec![
            stored_message("p1", "alice", "bob", "one", None),
            stored_message("p2", "bob", "alice", "two", None),
        ]);
        let index = StubIndex::new();
        let (result, output) = run(CliCommand::Reindex, &services(&store, Some(&index))).await;

        result.expect("reindex");
        assert_eq!(output, "Reindexed 2 messages into namespace 'notion_mail'.\n");
        assert_eq!(index.upserts()[0].1.len(), 2);
    }

    #[tokio::test]
    async fn reindex_without_index_fails() {
        let store = StubStore::new();
        let (result, _) = run(CliCommand::Reindex, &services(&store, None)).await;

        let err = result.expect_err("no index");
        assert!(format!("{err:#}").contains("vector index is not configured"));
    }

    #[tokio::test]
    async fn stats_prints_totals() {
        let store = StubStore::with_messages(vec![
            stored_message("p1", "alice", "bob", "one", None),
            stored_message("p2", "alice", "carol", "two", None),
        ]);
        let (result, output) = run(CliCommand::Stats, &services(&store, None)).await;

        result.expect("stats");
        assert!(output.contains("Total messages: 2"));
        assert!(output.contains("  alice: 2"));
    }

    #[tokio::test]
    async fn doctor_fails_on_mismatch() {
        let mut schema = expected_schema();
        schema.properties.remove("Sender");
        schema
            .properties
            .insert("Timestamp".to_string(), PropertyKind::RichText);
        let store = StubStore::new().with_schema(schema);
        let (result, output) = run(CliCommand::Doctor, &services(&store, None)).await;

        assert!(result.is_err());
        assert!(output.contains("Missing properties:"));
        assert!(output.contains("Sender"));
        assert!(output.contains("Timestamp (expected number, got rich_text)"));
    }

    #[tokio::test]
    async fn doctor_accepts_expected_schema() {
        let store = StubStore::new();
        let (result, output) = run(CliCommand::Doctor, &services(&store, None)).await;

        result.expect("doctor");
        assert!(output.contains("Database schema matches the message schema."));
    }

    #[tokio::test]
    async fn chat_without_model_fails() {
        let store = StubStore::new();
        let (result, _) = run(CliCommand::Chat, &services(&store, None)).await;

        let err = result.expect_err("no model");
        assert!(format!("{err:#}").contains("OPENAI_API_KEY"));
    }
}
