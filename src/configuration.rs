use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "slotbook", about = "Availability and booking service")]
pub struct Configuration {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1")]
    pub bind: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 3000)]
    pub port: u16,
}
