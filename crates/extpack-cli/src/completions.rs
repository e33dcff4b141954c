use clap::CommandFactory;
use clap_complete::Shell;

use crate::Cli;

pub(crate) fn write_completions(shell: Shell) {
    let mut command = Cli::command();
    clap_complete::generate(shell, &mut command, "extpack", &mut std::io::stdout());
}
