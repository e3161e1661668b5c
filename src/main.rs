use clap::Parser;
use service_colors::{cli, config, render};
use cli::{Cli, Commands};
use config::Config;
use service_colors_common::MatchStrategy;
use tracing::Level;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Classify { inputs, json, longest } => {
            if longest {
                config.colors.match_strategy = MatchStrategy::Longest;
            }
            let table = config.colors.table();

            // 引数なしなら対話入力（空行で終了）
            let inputs = if inputs.is_empty() {
                prompt_inputs()?
            } else {
                inputs
            };

            let results = render::classify_all(&inputs, &table);
            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                for result in &results {
                    println!("{}\t{}", result.category, result.input);
                }
            }
        }

        Commands::Table { json } => {
            let table = config.colors.table();
            if json {
                println!("{}", serde_json::to_string_pretty(table.entries())?);
            } else {
                println!("{}", render::format_table(&table));
            }
        }

        Commands::Render { kind, name, service_type, classes, attributes } => {
            let table = config.colors.table();
            let html = render::render_element(
                kind,
                &name,
                service_type.as_deref(),
                &classes,
                &attributes,
                &table,
            )?;
            println!("{}", html);
        }

        Commands::Config { show, init } => {
            if init {
                if config.path.exists() {
                    println!("設定ファイルは既に存在します: {}", config.path.display());
                } else {
                    config.save()?;
                    println!("✔ 設定ファイルを作成: {}", config.path.display());
                }
            }

            if show || !init {
                println!("設定ファイル: {}", config.path.display());
                println!("{}", serde_json::to_string_pretty(&config.colors)?);
            }
        }
    }

    Ok(())
}

fn prompt_inputs() -> anyhow::Result<Vec<String>> {
    let mut inputs = Vec::new();
    loop {
        let input: String = dialoguer::Input::new()
            .with_prompt("サービス名（空行で終了）")
            .allow_empty(true)
            .interact_text()?;
        if input.trim().is_empty() {
            break;
        }
        inputs.push(input);
    }
    Ok(inputs)
}
