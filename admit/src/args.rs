use clap::{Arg, ArgAction, Command, arg};
use std::ffi::OsString;

pub struct Args {
    pub topic: String,
    pub envelope: Option<String>,
    pub envelope_file: Option<String>,
    pub previous_coins: Vec<u32>,
    pub config_file: Option<String>,
    pub log_level: String,
    pub logdir: Option<String>,
    pub describe: bool,
}

pub fn cli() -> Command {
    Command::new("overlay-admit")
        .about(format!("{} v{}", env!("CARGO_PKG_DESCRIPTION"), env!("CARGO_PKG_VERSION")))
        .version(env!("CARGO_PKG_VERSION"))
        .arg(Arg::new("topic").long("topic").value_name("TOPIC").required(true).help("Topic to evaluate the transaction for, e.g. tm_tokens"))
        .arg(
            Arg::new("envelope")
                .long("envelope")
                .value_name("HEX")
                .conflicts_with("envelope-file")
                .help("Hex encoded BEEF, Atomic BEEF or Extended Format transaction"),
        )
        .arg(
            Arg::new("envelope-file")
                .long("envelope-file")
                .value_name("PATH")
                .help("File holding the transaction envelope, raw or hex encoded"),
        )
        .arg(
            Arg::new("previous-coins")
                .long("previous-coins")
                .value_name("INDICES")
                .value_delimiter(',')
                .value_parser(clap::value_parser!(u32))
                .help("Comma separated indices of the inputs spending coins tracked by the topic"),
        )
        .arg(arg!(-C --config <CONFIG_FILE> "Path of the TOML configuration file."))
        .arg(
            Arg::new("loglevel")
                .long("loglevel")
                .value_name("LEVEL")
                .default_value("info")
                .help("Logging level {off, error, warn, info, debug, trace}\n-- You may also specify <module>=<level>,<module2>=<level>,... to set the log level of individual modules."),
        )
        .arg(arg!(--logdir <LOG_DIR> "Directory to log output."))
        .arg(
            Arg::new("describe")
                .long("describe")
                .action(ArgAction::SetTrue)
                .help("Print the metadata and documentation of the topic instead of evaluating a transaction"),
        )
}

impl Args {
    pub fn parse<I, T>(itr: I) -> Result<Args, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let m = cli().try_get_matches_from(itr)?;
        Ok(Args {
            topic: m.get_one::<String>("topic").cloned().unwrap_or_default(),
            envelope: m.get_one::<String>("envelope").cloned(),
            envelope_file: m.get_one::<String>("envelope-file").cloned(),
            previous_coins: m.get_many::<u32>("previous-coins").map(|coins| coins.copied().collect()).unwrap_or_default(),
            config_file: m.get_one::<String>("config").cloned(),
            log_level: m.get_one::<String>("loglevel").cloned().unwrap_or_default(),
            logdir: m.get_one::<String>("logdir").cloned(),
            describe: m.get_flag("describe"),
        })
    }
}

pub fn parse_args() -> Args {
    match Args::parse(std::env::args_os()) {
        Ok(args) => args,
        Err(err) => err.exit(),
    }
}
