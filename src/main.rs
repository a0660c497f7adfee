use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{error, info};
use simplelog::{
    format_description, ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::File;
use std::path::Path;
use std::process::ExitCode;

use run_arm_controller::application;
use run_arm_controller::config::{ControlConfig, Parameters};
use run_arm_controller::constants::{FILEPATH_LOG, FILEPATH_PARAMETERS_CONTROL};

fn main() -> ExitCode {
    // Parse the command line arguments
    let matches = build_command().get_matches();

    // Check the log filter
    let log_filter = get_log_filter(matches.get_one::<u32>("level"));

    // Initiate the logger
    initiate_logger(log_filter, FILEPATH_LOG);
    info!("Log level: {log_filter}.");

    // Run the application
    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

/// Build the command line interface.
///
/// # Returns
/// Command.
fn build_command() -> Command {
    Command::new("arm controller")
        .about("Controls a mechanical arm joint with the activity of two muscles.")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Parameters file. The other options override its values.")
                .default_value(FILEPATH_PARAMETERS_CONTROL),
        )
        .arg(
            Arg::new("simulate")
                .short('s')
                .long("simulate")
                .action(ArgAction::SetTrue)
                .help("Run the simulation mode"),
        )
        .arg(
            Arg::new("level")
                .short('l')
                .long("log-level")
                .help("Log level: 0 (Off), 1 (Error), 2 (Warn), 3 (Info), 4 (Debug), 5 (Trace)")
                .default_value("3")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("address")
                .long("address")
                .help("The I2C address of the interface we are connecting to, e.g. 0x68.")
                .value_parser(parse_address),
        )
        .arg(
            Arg::new("flexing-channel")
                .long("flexing-channel")
                .alias("flexingchannel")
                .help("The channel of the analog pin where the muscle sensor for the flexing muscle is connected.")
                .value_parser(value_parser!(u8)),
        )
        .arg(
            Arg::new("extending-channel")
                .long("extending-channel")
                .alias("extendingchannel")
                .help("The channel of the analog pin where the muscle sensor for the extending muscle is connected.")
                .value_parser(value_parser!(u8)),
        )
        .arg(
            Arg::new("speed-channel")
                .long("speed-channel")
                .alias("speedchannel")
                .help("The channel of the analog pin where the potentiometer for controlling the motor speed is connected.")
                .value_parser(value_parser!(u8)),
        )
        .arg(
            Arg::new("motor-in1")
                .long("motor-in1")
                .alias("motorin1")
                .help("The header pin where the IN1 channel for the motor driver is connected.")
                .value_parser(value_parser!(u8)),
        )
        .arg(
            Arg::new("motor-in2")
                .long("motor-in2")
                .alias("motorin2")
                .help("The header pin where the IN2 channel for the motor driver is connected.")
                .value_parser(value_parser!(u8)),
        )
        .arg(
            Arg::new("motor-ena")
                .long("motor-ena")
                .alias("motorena")
                .help("The header pin where the ENA channel for the motor driver is connected.")
                .value_parser(value_parser!(u8)),
        )
        .arg(
            Arg::new("interval")
                .long("interval")
                .help("The amount of seconds that passes between two measurements.")
                .value_parser(value_parser!(f64)),
        )
        .arg(
            Arg::new("speed")
                .long("speed")
                .help("The constant speed that the motor should use. If this is negative, the potentiometer is used.")
                .allow_negative_numbers(true)
                .value_parser(value_parser!(i32)),
        )
        .arg(
            Arg::new("threshold")
                .long("threshold")
                .help("If a measured value is above 0 and below the threshold, the muscle is treated as active.")
                .allow_negative_numbers(true)
                .value_parser(value_parser!(i32)),
        )
}

/// Load the configuration and run the application.
///
/// # Arguments
/// * `matches` - Command line arguments.
///
/// # Errors
/// If the configuration is invalid or the devices can not be initialized.
fn run(matches: &ArgMatches) -> Result<()> {
    let filepath = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or(FILEPATH_PARAMETERS_CONTROL);

    let mut parameters = Parameters::from_file(Path::new(filepath))
        .context("Failed to load the control parameters")?;
    override_parameters(&mut parameters, matches);

    let config = ControlConfig::new(&parameters).context("Invalid control parameters")?;

    application::run(config, matches.get_flag("simulate"))
        .context("Failed to initialize the devices")?;

    Ok(())
}

/// Parse the I2C address in the decimal or hexadecimal (0x) notation.
///
/// # Arguments
/// * `value` - Value to parse.
///
/// # Returns
/// Address.
///
/// # Errors
/// If the value is not an unsigned 16-bit number.
fn parse_address(value: &str) -> Result<u16, String> {
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => value.parse::<u16>(),
    };

    parsed.map_err(|error| format!("{value} is not an address: {error}"))
}

/// Override the parameters with the command line arguments.
///
/// # Arguments
/// * `parameters` - Parameters from the file.
/// * `matches` - Command line arguments.
fn override_parameters(parameters: &mut Parameters, matches: &ArgMatches) {
    if let Some(address) = matches.get_one::<u16>("address") {
        parameters.address = *address;
    }

    if let Some(channel) = matches.get_one::<u8>("flexing-channel") {
        parameters.flexing_channel = *channel;
    }
    if let Some(channel) = matches.get_one::<u8>("extending-channel") {
        parameters.extending_channel = *channel;
    }
    if let Some(channel) = matches.get_one::<u8>("speed-channel") {
        parameters.speed_channel = *channel;
    }

    if let Some(pin) = matches.get_one::<u8>("motor-in1") {
        parameters.motor_in1 = *pin;
    }
    if let Some(pin) = matches.get_one::<u8>("motor-in2") {
        parameters.motor_in2 = *pin;
    }
    if let Some(pin) = matches.get_one::<u8>("motor-ena") {
        parameters.motor_ena = *pin;
    }

    if let Some(interval) = matches.get_one::<f64>("interval") {
        parameters.interval = *interval;
    }
    if let Some(speed) = matches.get_one::<i32>("speed") {
        parameters.speed = *speed;
    }
    if let Some(threshold) = matches.get_one::<i32>("threshold") {
        parameters.threshold = *threshold;
    }
}

/// Get the log filter.
///
/// # Arguments
/// * `log_level` - Log level.
///
/// # Returns
/// Log filter.
fn get_log_filter(log_level: Option<&u32>) -> LevelFilter {
    match log_level {
        Some(level) => match level {
            0 => LevelFilter::Off,
            1 => LevelFilter::Error,
            2 => LevelFilter::Warn,
            3 => LevelFilter::Info,
            4 => LevelFilter::Debug,
            5 => LevelFilter::Trace,
            _ => LevelFilter::Info,
        },
        None => LevelFilter::Info,
    }
}

/// Initiate the logger.
///
/// # Arguments
/// * `level` - Log level.
/// * `filepath` - Log file path.
fn initiate_logger(level: LevelFilter, filepath: &str) {
    let config = ConfigBuilder::new()
        .set_time_format_custom(format_description!(
            "[year]/[month]/[day] [hour]:[minute]:[second].[subsecond]"
        ))
        .build();

    // Log to the terminal
    let logger_terminal = TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );

    // Log to the file
    match File::create(filepath) {
        Ok(file) => {
            let logger_file = WriteLogger::new(level, config, file);
            let _ = CombinedLogger::init(vec![logger_terminal, logger_file]);
        }
        Err(error) => {
            eprintln!("Failed to create the log file: {error}.");
            let _ = CombinedLogger::init(vec![logger_terminal]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_parameters() -> Parameters {
        Parameters::from_file(Path::new(FILEPATH_PARAMETERS_CONTROL)).unwrap()
    }

    #[test]
    fn test_get_log_filter() {
        assert_eq!(get_log_filter(Some(&0)), LevelFilter::Off);
        assert_eq!(get_log_filter(Some(&1)), LevelFilter::Error);
        assert_eq!(get_log_filter(Some(&2)), LevelFilter::Warn);
        assert_eq!(get_log_filter(Some(&3)), LevelFilter::Info);
        assert_eq!(get_log_filter(Some(&4)), LevelFilter::Debug);
        assert_eq!(get_log_filter(Some(&5)), LevelFilter::Trace);

        assert_eq!(get_log_filter(Some(&6)), LevelFilter::Info);

        assert_eq!(get_log_filter(None), LevelFilter::Info);
    }

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("0x68"), Ok(0x68));
        assert_eq!(parse_address("0X69"), Ok(0x69));
        assert_eq!(parse_address("104"), Ok(104));

        assert!(parse_address("0xZZ").is_err());
        assert!(parse_address("-1").is_err());
    }

    #[test]
    fn test_override_parameters_none() {
        let matches = build_command()
            .try_get_matches_from(["arm_controller"])
            .unwrap();

        let mut parameters = create_parameters();
        override_parameters(&mut parameters, &matches);

        assert_eq!(parameters, create_parameters());
        assert!(!matches.get_flag("simulate"));
    }

    #[test]
    fn test_override_parameters() {
        let matches = build_command()
            .try_get_matches_from([
                "arm_controller",
                "--simulate",
                "--address",
                "0x6A",
                "--flexingchannel",
                "5",
                "--extending-channel",
                "6",
                "--motorin1",
                "11",
                "--interval",
                "0.05",
                "--speed",
                "-1",
                "--threshold",
                "80",
            ])
            .unwrap();

        let mut parameters = create_parameters();
        override_parameters(&mut parameters, &matches);

        assert_eq!(parameters.address, 0x6A);
        assert_eq!(parameters.flexing_channel, 5);
        assert_eq!(parameters.extending_channel, 6);
        assert_eq!(parameters.speed_channel, 3);
        assert_eq!(parameters.motor_in1, 11);
        assert_eq!(parameters.motor_in2, 40);
        assert_eq!(parameters.interval, 0.05);
        assert_eq!(parameters.speed, -1);
        assert_eq!(parameters.threshold, 80);

        assert!(matches.get_flag("simulate"));
    }

    #[test]
    fn test_override_parameters_fixed_speed() {
        let matches = build_command()
            .try_get_matches_from(["arm_controller", "--speed", "512"])
            .unwrap();

        let mut parameters = create_parameters();
        override_parameters(&mut parameters, &matches);

        assert_eq!(
            ControlConfig::new(&parameters).unwrap().fixed_speed,
            Some(512)
        );
    }
}
