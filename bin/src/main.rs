use log::error;
use persistance::{
    fs::{
        config::read_config,
        install,
        utils::{get_config_location, get_data_dir_location, parse_location},
    },
    users::UserStore,
};
use std::process::exit;
use www::server;

#[tokio::main]
async fn main() {
    pretty_env_logger::init();
    let args = std::env::args().skip(1).collect::<Vec<String>>();
    for arg in args.iter() {
        match arg.as_ref() {
            "-v" | "--version" => return print_version(),
            "-h" | "--help" => return print_help(),
            "-i" | "--init" => {
                if let Err(e) = install() {
                    error!("{}", e);
                    exit(1);
                }
                return;
            }
            _ => {
                eprintln!("unknown option: {}", arg);
                exit(1);
            }
        }
    }
    let config = match read_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            eprintln!("run `roster --init` to create a default config");
            exit(1);
        }
    };
    let users = match UserStore::load(parse_location(&config.general.users_location)) {
        Ok(users) => users,
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    };
    server(config, users).await;
}

fn print_version() {
    println!("roster v{}", env!("CARGO_PKG_VERSION"),);
}

fn print_help() {
    println!(
        "\nConfig file found at {}\nData files found at {}\n",
        format!("\x1b[38;5;47m{:#?}\x1b[0m", get_config_location().1),
        format!("\x1b[38;5;37m{:#?}\x1b[0m", get_data_dir_location())
    );
    print!(
        "Usage: roster [options]
        Options:
        -i, --init                   Write a default config and user file
        -v, --version                Print version.
        -h, --help                   Show this message.

        The log level is read from RUST_LOG, e.g. RUST_LOG=info roster
        ",
    );
}
