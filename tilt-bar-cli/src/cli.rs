mod solve;
mod sweep;

type AnyResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

const BIN_NAME: &str = env!("CARGO_BIN_NAME");

#[derive(clap::Parser)]
#[clap(name = BIN_NAME, version, about)]
pub(crate) struct Entry {
    #[clap(subcommand)]
    cmd: Cmd,
}

#[derive(clap::Subcommand)]
enum Cmd {
    /// Solve one linkage across the required tilt range
    Solve(solve::Solve),
    /// Search the design space for the best worst-case torque ratio
    Sweep(sweep::Sweep),
}

impl Entry {
    pub(super) fn main() {
        register_panic_hook();
        let entry = <Self as clap::Parser>::parse_from(wild::args());
        let res = match entry.cmd {
            Cmd::Solve(cmd) => solve::solve(cmd),
            Cmd::Sweep(cmd) => sweep::sweep(cmd),
        };
        if let Err(e) = res {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn register_panic_hook() {
    // Print panic messages without stack trace
    std::panic::set_hook(Box::new(|info| {
        match info.payload().downcast_ref::<&str>() {
            Some(s) => eprintln!("{s}"),
            None => eprintln!("{info}"),
        }
        std::process::exit(1);
    }));
}
