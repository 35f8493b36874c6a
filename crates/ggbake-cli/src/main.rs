//! CLI entry point - the composition root.
//!
//! Adapters are wired together in bootstrap; command dispatch routes to
//! handlers which drive the pipeline one user action at a time.

use clap::Parser;

use ggbake_cli::{Cli, CliConfig, Commands, bootstrap, handlers};

#[tokio::main]
async fn main() {
    // Load environment variables before parsing (some args have env fallbacks)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging; --verbose wins unless RUST_LOG is set explicitly
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = CliConfig::with_defaults();
    let ctx = bootstrap(&config);

    let Some(command) = cli.command else {
        // No command provided - show help
        use clap::CommandFactory;
        let _ = Cli::command().print_help();
        return;
    };

    let result = match command {
        Commands::List { repo, revision } => {
            handlers::list::execute(&ctx, &repo, &revision).await
        }
        Commands::Pull {
            repo,
            file,
            revision,
            out,
        } => {
            let args = handlers::pull::PullArgs {
                repo: &repo,
                file: file.as_deref(),
                revision: &revision,
                out: &out,
            };
            handlers::pull::execute(&ctx, args).await
        }
        Commands::Bake {
            repo,
            file,
            revision,
            tag,
            context,
            platform,
            prompt_template,
            reverse_prompt,
            push,
            push_tag,
            out,
        } => {
            let args = handlers::bake::BakeArgs {
                repo,
                file,
                revision,
                tag,
                context,
                platform,
                prompt_template,
                reverse_prompt,
                push,
                push_tag,
                out,
            };
            handlers::bake::execute(&ctx, args).await
        }
        Commands::Publish {
            image,
            archive,
            username,
            password,
            registry,
        } => {
            let args = handlers::publish::PublishArgs {
                image,
                archive,
                username,
                password,
                registry,
            };
            handlers::publish::execute(&ctx, args).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}
