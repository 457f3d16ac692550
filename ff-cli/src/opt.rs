use clap::{Parser, Subcommand};
use clio::Input;

#[derive(Debug, Parser)]
#[command(name = "ff-cli", about = "FellowFlight travel matching client")]
pub struct Opt {
    /// Config file path
    #[arg(short, long, value_parser, default_value = "config.toml")]
    pub config: Input,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluates the navigation guard for a location
    Route {
        /// Location being navigated to, e.g. `/matches`
        path: String,

        /// Browser `Cookie` header holding the session markers
        #[arg(long, env = "FELLOWFLIGHT_COOKIES", default_value = "")]
        cookies: String,
    },

    /// Loads and prints the matches of a flight
    Matches {
        flight_id: i64,

        /// Browser `Cookie` header holding the session markers
        #[arg(long, env = "FELLOWFLIGHT_COOKIES", default_value = "")]
        cookies: String,

        /// Random portraits instead of initials for avatars
        #[arg(long)]
        random_avatars: bool,
    },

    /// Prints airport suggestions for a query
    Airports { query: String },
}
