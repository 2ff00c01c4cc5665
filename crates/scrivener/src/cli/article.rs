//! The `scrivener article` command for job-posting articles.

use clap::{Args, Subcommand};
use scrivener_core::{ArticleService, PlatformType};
use std::io::Read;
use std::path::{Path, PathBuf};

use super::Context;

/// Arguments for the `article` command.
#[derive(Args, Debug)]
pub struct ArticleArgs {
    #[command(subcommand)]
    pub command: ArticleCommand,
}

/// Article subcommands.
#[derive(Subcommand, Debug)]
pub enum ArticleCommand {
    /// Print tags as a JSON object
    Tags(ArticleInput),

    /// Print a polished version of the article
    Polish(ArticleInput),
}

/// Article source and audience.
#[derive(Args, Debug)]
pub struct ArticleInput {
    /// Profession: apen, nurse or phar
    #[arg(short = 'P', long)]
    pub platform: PlatformType,

    /// Article file (reads stdin when omitted)
    pub file: Option<PathBuf>,
}

/// Execute the article command.
pub async fn execute(ctx: &Context, args: ArticleArgs) -> anyhow::Result<()> {
    let service = ArticleService::new(ctx.generator()?, ctx.config.article.clone());

    let output = match args.command {
        ArticleCommand::Tags(input) => {
            let content = read_content(input.file.as_deref())?;
            service.extract_tags(&content, input.platform).await?
        }
        ArticleCommand::Polish(input) => {
            let content = read_content(input.file.as_deref())?;
            service.polish(&content, input.platform).await?
        }
    };

    println!("{output}");
    Ok(())
}

fn read_content(file: Option<&Path>) -> anyhow::Result<String> {
    let content = match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    if content.trim().is_empty() {
        anyhow::bail!("Article is empty");
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reads_article_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "誠徵全職主治醫師").unwrap();
        let content = read_content(Some(file.path())).unwrap();
        assert_eq!(content, "誠徵全職主治醫師");
    }

    #[test]
    fn test_rejects_blank_article() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "  \n").unwrap();
        assert!(read_content(Some(file.path())).is_err());
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = read_content(Some(Path::new("/nonexistent/article.txt"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/article.txt"));
    }
}
