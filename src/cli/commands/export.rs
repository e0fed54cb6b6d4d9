use crate::cli::commands::{open_session, summary_query};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::export::logic::build_title;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        category,
        range,
        force,
    } = cmd
    {
        let query = summary_query(*category, range.as_deref())?;
        let mut session = open_session(cfg)?;
        let bundle = session.summary(&query, false)?;

        let title = build_title(range.as_deref(), *category);
        ExportLogic::export(&bundle, *format, file, &title, *force)?;
    }
    Ok(())
}
