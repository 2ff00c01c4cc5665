//! The `scrivener generate` command for raw generation requests.

use clap::Args;
use scrivener_core::{GenerationOptions, GenerationRequest, ResponseFormat};

use super::Context;

/// Arguments for the `generate` command.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// System prompt
    #[arg(short, long, default_value = "")]
    pub system: String,

    /// User text
    #[arg(short, long, default_value = "")]
    pub text: String,

    /// Image URI to attach (repeatable)
    #[arg(short, long = "image")]
    pub images: Vec<String>,

    /// Ask the provider for a JSON object
    #[arg(long)]
    pub json: bool,

    /// Maximum output tokens
    #[arg(long, default_value = "1024")]
    pub max_tokens: u32,
}

impl GenerateArgs {
    fn into_request(self) -> anyhow::Result<(GenerationRequest, GenerationOptions)> {
        if self.text.is_empty() && self.images.is_empty() {
            anyhow::bail!("Nothing to send: pass --text, --image or both");
        }
        let options = GenerationOptions {
            max_tokens: self.max_tokens,
            model: None,
            response_format: if self.json {
                ResponseFormat::Json
            } else {
                ResponseFormat::Text
            },
        };
        let request = GenerationRequest {
            system_prompt: self.system,
            text: self.text,
            image_urls: self.images,
        };
        Ok((request, options))
    }
}

/// Execute the generate command.
pub async fn execute(ctx: &Context, args: GenerateArgs) -> anyhow::Result<()> {
    let generator = ctx.generator()?;
    let (request, options) = args.into_request()?;

    let text = generator.generate(&request, &options).await?;
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        args: GenerateArgs,
    }

    #[test]
    fn test_json_flag_selects_json_format() {
        let args = GenerateArgs {
            system: "sys".to_string(),
            text: "hi".to_string(),
            images: vec!["https://x/a.png".to_string()],
            json: true,
            max_tokens: 64,
        };
        let (request, options) = args.into_request().unwrap();
        assert_eq!(options.response_format, ResponseFormat::Json);
        assert_eq!(options.max_tokens, 64);
        assert_eq!(request.image_urls.len(), 1);
        assert_eq!(request.system_prompt, "sys");
    }

    #[test]
    fn test_image_only_request_is_allowed() {
        let cli = TestCli::try_parse_from(["generate", "--image", "https://x/a.png"]).unwrap();
        let (request, options) = cli.args.into_request().unwrap();
        assert!(request.text.is_empty());
        assert_eq!(request.image_urls, vec!["https://x/a.png"]);
        assert_eq!(options.response_format, ResponseFormat::Text);
    }

    #[test]
    fn test_empty_request_is_rejected() {
        let cli = TestCli::try_parse_from(["generate", "--system", "sys"]).unwrap();
        assert!(cli.args.into_request().is_err());
    }
}
