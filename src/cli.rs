use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use inquire::Text;

use crate::service::extractor::EventExtractor;
use crate::service::link_builder::CalendarLinkBuilder;
use crate::service::reply_service::{CalendarLinks, ReplyService};

#[derive(Parser)]
#[command(about = "Turn a chat message into a pre-filled calendar link")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the calendar link for a message
    Parse {
        text: String,
        /// Current moment as YYYY-MM-DDTHH:MM:SS, defaults to the local clock
        #[arg(long)]
        now: Option<NaiveDateTime>,
        /// Print the extracted event as JSON instead of the link
        #[arg(long)]
        json: bool,
    },
    /// Ask for a message and print the reply the bot would send
    Prompt {},
}

pub fn cli(extractor: EventExtractor, builder: CalendarLinkBuilder) {
    let cli = Cli::parse();
    if let Err(e) = run(cli.command, extractor, builder) {
        println!("{}", e);
    }
}

pub fn run(
    command: Commands,
    extractor: EventExtractor,
    builder: CalendarLinkBuilder,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Parse { text, now, json } => {
            let now = now.unwrap_or_else(|| Local::now().naive_local());
            println!("{}", render_parse(&extractor, &builder, &text, now, json)?);
        }
        Commands::Prompt {} => {
            let text = specify_message()?;
            let replies = ReplyService::new(Arc::new(CalendarLinks::new(extractor, builder)));
            println!("{}", replies.compose(&text, Local::now().naive_local()));
        }
    }
    Ok(())
}

pub fn render_parse(
    extractor: &EventExtractor,
    builder: &CalendarLinkBuilder,
    text: &str,
    now: NaiveDateTime,
    json: bool,
) -> Result<String, serde_json::Error> {
    let record = extractor.extract(text, now);
    if json {
        serde_json::to_string_pretty(&record)
    } else {
        Ok(builder.build(&record))
    }
}

fn specify_message() -> Result<String, Box<dyn std::error::Error>> {
    Ok(Text::new("Enter your message.").prompt()?)
}
