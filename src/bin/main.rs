use dotenv::dotenv;

use clap::{Arg, Command};

use tagged_articles::{app::*, error::*};

fn cli() -> Command {
  Command::new("tagged-articles")
    .about("Basic-auth guarded JSON service for tagged articles")
    .arg(Arg::new("config")
      .short('c')
      .long("config")
      .value_name("FILE")
      .help("Config file, replaces conf/<RUN_MODE>"))
    .subcommand(Command::new("serve")
      .about("Run the HTTP server (default)"))
    .subcommand(Command::new("hash-password")
      .about("Print a password hash for auth.password_hash")
      .arg(Arg::new("password").required(true)))
}

fn main() -> Result<()> {
  dotenv().ok();
  env_logger::init();

  let cli = cli().get_matches();

  match cli.subcommand() {
    Some(("hash-password", args)) => {
      let password = args.get_one::<String>("password")
        .ok_or_else(|| Error::Configuration("missing password".to_string()))?;
      hash_password::execute(password)?;
    },
    // default to 'serve' command.
    _ => {
      let config_file = cli.get_one::<String>("config").map(|s| s.as_str());
      let config = AppConfig::load(config_file)?;
      serve::execute(config)?;
    },
  }
  log::info!("Main finished");
  Ok(())
}
