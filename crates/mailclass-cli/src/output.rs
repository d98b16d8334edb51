use std::io::Write;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use mailclass_core::{
    ClassificationOptions, ClassificationResult, ClassifyError, ClientConfig, ResultPresenter,
    SelectedFile, format_file_size,
};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Spinner shown while a request is in flight.
pub fn spinner(message: &'static str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

/// Print the file about to be sent and the options in effect.
pub fn print_selection(
    w: &mut dyn Write,
    file: &SelectedFile,
    options: &ClassificationOptions,
    color: ColorMode,
) -> std::io::Result<()> {
    let size = format_file_size(file.size_bytes);
    if color.enabled() {
        writeln!(w, "{} {} ({})", "Arquivo:".bold(), file.name, size.dimmed())?;
    } else {
        writeln!(w, "Arquivo: {} ({})", file.name, size)?;
    }
    writeln!(
        w,
        "Stemming: {} | Modelo: {}",
        if options.stemming_enabled { "sim" } else { "não" },
        options.provider.label()
    )?;
    writeln!(w)?;
    Ok(())
}

/// Print the verdict, suggested reply and content preview.
pub fn print_result(
    w: &mut dyn Write,
    presenter: &ResultPresenter<'_>,
    color: ColorMode,
) -> std::io::Result<()> {
    let category = presenter.category();
    if color.enabled() {
        let badge = if presenter.is_primary_bucket() {
            format!("{}", category.bold().green())
        } else {
            format!("{}", category.bold().yellow())
        };
        writeln!(w, "{} {}", "Análise Concluída:".bold(), badge)?;
    } else {
        writeln!(w, "Análise Concluída: {}", category)?;
    }
    writeln!(
        w,
        "Confiança: {} | Modelo: {}",
        presenter.confidence(),
        presenter.provider_label()
    )?;
    writeln!(w)?;

    if color.enabled() {
        writeln!(w, "{}", "Resposta Sugerida".bold().cyan())?;
    } else {
        writeln!(w, "Resposta Sugerida")?;
    }
    writeln!(w, "{}", presenter.suggested_reply())?;
    writeln!(w)?;

    let heading = format!("Prévia do Conteúdo [{}]", presenter.language());
    if color.enabled() {
        writeln!(w, "{}", heading.bold())?;
        writeln!(w, "{}", presenter.preview().dimmed())?;
    } else {
        writeln!(w, "{}", heading)?;
        writeln!(w, "{}", presenter.preview())?;
    }
    Ok(())
}

pub fn print_json(w: &mut dyn Write, result: &ClassificationResult) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(result).map_err(std::io::Error::other)?;
    writeln!(w, "{}", json)
}

pub fn print_error(w: &mut dyn Write, err: &ClassifyError, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "ERRO:".red().bold(), err)
    } else {
        writeln!(w, "ERRO: {}", err)
    }
}

pub fn print_health(
    w: &mut dyn Write,
    url: &str,
    status: &str,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {} ({})", "OK".green().bold(), url, status)
    } else {
        writeln!(w, "OK {} ({})", url, status)
    }
}

pub fn print_config(
    w: &mut dyn Write,
    client: &ClientConfig,
    options: &ClassificationOptions,
) -> std::io::Result<()> {
    writeln!(w, "base_url     = {}", client.base_url)?;
    writeln!(w, "timeout_secs = {}", client.timeout.as_secs())?;
    writeln!(w, "provider     = {}", options.provider)?;
    writeln!(w, "stemming     = {}", options.stemming_enabled)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailclass_core::Provider;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> std::io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn verdict() -> ClassificationResult {
        ClassificationResult {
            category: "Improdutivo".to_string(),
            confidence: 0.873,
            suggested_reply: "Obrigado pela mensagem!".to_string(),
            language: "pt".to_string(),
            preview: "Feliz natal a todos".to_string(),
            provider: None,
        }
    }

    #[test]
    fn plain_result_lists_every_field() {
        let result = verdict();
        let presenter = ResultPresenter::new(&result, Provider::HuggingFace);
        let out = render(|w| print_result(w, &presenter, ColorMode(false)));
        assert!(out.contains("Análise Concluída: Improdutivo"));
        assert!(out.contains("Confiança: 87.3% | Modelo: huggingface"));
        assert!(out.contains("Obrigado pela mensagem!"));
        assert!(out.contains("Prévia do Conteúdo [pt]"));
        assert!(out.contains("Feliz natal a todos"));
    }

    #[test]
    fn plain_error_is_the_message() {
        let err = ClassifyError::server_rejected(500, "server error");
        let out = render(|w| print_error(w, &err, ColorMode(false)));
        assert_eq!(out, "ERRO: server error\n");
    }

    #[test]
    fn selection_shows_size_and_options() {
        let file = SelectedFile::from_bytes("mail.pdf", vec![0; 1536]);
        let options = ClassificationOptions {
            stemming_enabled: true,
            provider: Provider::OpenAi,
        };
        let out = render(|w| print_selection(w, &file, &options, ColorMode(false)));
        assert!(out.starts_with("Arquivo: mail.pdf (1.5 KB)"));
        assert!(out.contains("Stemming: sim | Modelo: OpenAI (GPT-4o-mini)"));
    }

    #[test]
    fn json_round_trips() {
        let out = render(|w| print_json(w, &verdict()));
        let parsed: ClassificationResult = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, verdict());
    }
}
