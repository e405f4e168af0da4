use std::{env, process, sync::Arc};

use serde_json::Value as JsonValue;

use chainflow::{
    config::Config,
    core::{CallParts, ChainLoader, ChainRegistry},
    engine::ChainEngine,
    logging::Logger,
};

/// Built-in demo configuration used when no config file is given
const DEFAULT_CONF: &str = r#"
log:
  level: info
chains:
  - id: demo
    handlers:
      - name: request_id
      - name: set_vars
        config:
          vars:
            user: alice
      - name: guard
        config:
          var: user
          pattern: "^[a-z]+$"
          status: 401
          message: unauthorized
      - name: counter
      - name: respond
        config:
          body:
            greeting: hello
"#;

fn usage() -> ! {
    eprintln!("usage: chainflow [-c config.yaml] [chain-id] [json-arg ...]");
    process::exit(2);
}

fn main() {
    // Read command-line arguments
    let mut args: Vec<String> = env::args().skip(1).collect();

    let config = if args.first().map(String::as_str) == Some("-c") {
        if args.len() < 2 {
            usage();
        }
        let path = args.remove(1);
        args.remove(0);
        Config::load_from_yaml(path).expect("Failed to load configuration")
    } else {
        Config::from_yaml(DEFAULT_CONF).expect("Failed to load built-in configuration")
    };

    // Initialize logging
    Logger::new(config.log.clone())
        .init()
        .expect("Failed to initialize logging");

    // Load chains from configuration
    log::info!("Loading chains...");
    let registry = Arc::new(ChainRegistry::new());
    let loader = ChainLoader::new(registry.clone());
    loader
        .load_static_chains(&config)
        .expect("Failed to load chains");

    let chain_id = args
        .first()
        .cloned()
        .unwrap_or_else(|| "demo".to_string());

    // Remaining arguments become the positional call arguments; values
    // that are not valid JSON are passed through as strings.
    let call_args: Vec<JsonValue> = args
        .iter()
        .skip(1)
        .map(|raw| serde_json::from_str(raw).unwrap_or_else(|_| JsonValue::String(raw.clone())))
        .collect();

    let Some(executor) = registry.get_chain(&chain_id) else {
        eprintln!("unknown chain `{chain_id}`");
        process::exit(1);
    };

    let engine = ChainEngine::new(executor);
    let parts = CallParts::new("cli", call_args);

    match engine.invoke(&parts) {
        Ok(Some(response)) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&response).expect("response must serialize")
            );
        }
        Ok(None) => println!("null"),
        Err(e) => {
            log::error!("chain `{chain_id}` failed: {e}");
            process::exit(1);
        }
    }
}
