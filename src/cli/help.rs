//! CLI help: usage text and per-command help.

const USAGE: &str = "
Usage:
  {program} [options] <command> [<args>...]

  Commands:
	help [command]     Show help for a command
	list [object type] List objects of a given type (e.g. cluster, node, storage, vm, ...)
	login              Login to Proxmox server and display credentials (not necessary for most commands)

  Run '{program} --help' for the list of options.
";

/// Top-level usage text.
pub fn usage(program: &str) -> String {
    USAGE.replace("{program}", program)
}

/// Help for one command, or an "Unknown command" line.
pub fn command_help(command: &str, program: &str) -> String {
    match command {
        "l" | "ls" | "list" => format!(
            "List objects of a given type (e.g. cluster, node, storage, vm, ...)\n\
             examples:\n\
             \t{p} list cluster\n\
             \t{p} list node\n\
             \t{p} list storage\n\
             \t{p} list vm\n",
            p = program
        ),
        "login" => format!(
            "Login to Proxmox server and display credentials\n\
             examples:\n\
             \t{p} --username admin --realm pve login\n\
             \t{p} --username root@pam --otp 123456 login\n",
            p = program
        ),
        "h" | "help" => format!("Show help for a command\nexamples:\n\t{} help list\n", program),
        other => format!("Unknown command: {}\n", other),
    }
}
