use anyhow::Result;
use tracing::info;

use crate::cli::ui;
use crate::config::AppConfig;
use crate::solver;
use crate::trace::Tracer;

pub fn run(config: &AppConfig, a: &str, b: &str, c: &str) -> Result<()> {
    info!("Solving {a}*x^2 + {b}*x + {c} = 0");

    let tracer = Tracer::new(super::build_sink(config)?);

    // Parsing happens inside the traced call so a bad coefficient shows up
    // in the trace the same way a domain error does.
    let (x1, x2) = tracer.call("solve_quadratic", &(a, b, c), || {
        let a = solver::parse_coefficient(a)?;
        let b = solver::parse_coefficient(b)?;
        let c = solver::parse_coefficient(c)?;
        solver::solve_quadratic(a, b, c)
    })?;

    if x1 == x2 {
        println!(
            "Repeated root: x = {}",
            ui::style_text(&x1.to_string(), ui::StyleType::Value)
        );
    } else {
        println!(
            "Roots: x1 = {}, x2 = {}",
            ui::style_text(&x1.to_string(), ui::StyleType::Value),
            ui::style_text(&x2.to_string(), ui::StyleType::Value)
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solve_command_succeeds() {
        let config = AppConfig::default();
        assert!(run(&config, "1", "-5", "6").is_ok());
    }

    #[test]
    fn test_solve_command_surfaces_domain_error() {
        let config = AppConfig::default();
        let result = run(&config, "1", "0", "1");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("discriminant"));
    }

    #[test]
    fn test_solve_command_surfaces_parse_error() {
        let config = AppConfig::default();
        let result = run(&config, "abc", "2", "3");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not numeric"));
    }
}
