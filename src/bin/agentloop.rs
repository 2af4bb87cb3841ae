use agentloop::catalog::ToolCatalog;
use agentloop::config::{default_config_path, Settings};
use agentloop::reasoner::HeuristicReasoner;
use agentloop::session::{run_loop, SessionDeps};
use agentloop::worker;

fn run() -> Result<(), String> {
    let settings = Settings::from_path(&default_config_path()).map_err(|err| err.to_string())?;
    let worker_command = settings.worker_command().map_err(|err| err.to_string())?;

    println!("Try: 'hello Polly' or 'convert 25 usd to eur'. Ctrl+C to exit.");

    let reasoner = HeuristicReasoner;
    let catalog = ToolCatalog::builtin();
    let deps = SessionDeps {
        reasoner: &reasoner,
        catalog: &catalog,
        policy: &settings.guardrail,
        worker: worker_command,
        timeout: settings.invoke_timeout(),
        session_log: settings.session_log.clone(),
    };

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_loop(stdin.lock(), stdout.lock(), &deps).map_err(|err| err.to_string())
}

fn main() {
    // The tool-call pair in the startup argv selects one-shot worker
    // mode; otherwise this binary runs the interactive loop.
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Some((tool, payload)) = worker::tool_call_from_args(&args) {
        std::process::exit(worker::run_one_shot(&tool, &payload));
    }

    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
