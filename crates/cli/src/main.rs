//! Entry point for the command-line interface.
//! Delegates to dedicated modules for argument handling, the rewrite
//! command and rule verification.

use tempguard::args::{parse_cli, Commands, RulesCmd};
use tempguard::rewrite::run_rewrite;
use tempguard::rules::verify_rules;

fn main() -> anyhow::Result<()> {
    let cli = parse_cli();
    match cli.command {
        Commands::Rewrite(args) => run_rewrite(args),
        Commands::Rules(RulesCmd::Verify { path }) => verify_rules(&path),
    }
}
