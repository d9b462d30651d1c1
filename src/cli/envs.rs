use super::ui;
use crate::core::config::EnvironmentTable;
use anyhow::Result;
use comfy_table::Cell;
use std::path::Path;

/// Renders the environments of an env file with their tokens masked.
pub fn list_environments<P: AsRef<Path>>(env_file: P) -> Result<String> {
    let table = EnvironmentTable::load_from_path(env_file)?;
    Ok(display_environments(&table))
}

pub fn display_environments(environments: &EnvironmentTable) -> String {
    let mut output = format!(
        "Environments in {}\n\n",
        ui::style_text(&environments.path().display().to_string(), ui::StyleType::Title)
    );

    if environments.is_empty() {
        output.push_str(&ui::style_text(
            "No environments defined",
            ui::StyleType::Error,
        ));
        return output;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Name"),
        ui::header_cell("Token"),
        ui::header_cell("Base URL"),
    ]);
    for (i, env) in environments.iter().enumerate() {
        table.add_row(vec![
            ui::number_cell(i),
            Cell::new(&env.name),
            Cell::new(env.masked_token()),
            Cell::new(&env.base_url),
        ]);
    }
    output.push_str(&table.to_string());
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_masked() {
        let table = EnvironmentTable::parse(
            "env_file.csv",
            "dev,Tsk_32a0aad3142c,https://sandbox.iexapis.com/stable/stock/\nprod,pk_secret_value,https://cloud.iexapis.com/stable/stock/",
        )
        .unwrap();

        let output = display_environments(&table);
        assert!(output.contains("dev"));
        assert!(output.contains("prod"));
        assert!(output.contains("Tsk_****"));
        assert!(!output.contains("Tsk_32a0aad3142c"));
        assert!(!output.contains("pk_secret_value"));
    }

    #[test]
    fn test_empty_env_file() {
        let table = EnvironmentTable::parse("env_file.csv", "# nothing yet\n").unwrap();
        assert!(display_environments(&table).contains("No environments defined"));
    }
}
