//! Console line → turn request
//!
//! Plain text is a message. Slash commands drive the other turn kinds:
//!
//! | command            | turn                          |
//! |--------------------|-------------------------------|
//! | `/elegir 1 2 [dN]` | selection, optional day count |
//! | `/confirmar [A,B]` | confirm pending or named      |
//! | `/limpiar`         | clear the quote               |
//! | `/terminar`        | finalize the quote            |

use anyhow::{bail, Context, Result};

use booking_agent_agent::TurnRequest;

pub enum Command {
    Turn(TurnRequest),
    Help,
    Quit,
}

pub fn parse_line(line: &str) -> Result<Command> {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Turn(TurnRequest::text(line)));
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    let request = match name {
        "elegir" => {
            let mut selection = Vec::new();
            let mut days = None;
            for arg in args {
                if let Some(n) = arg.strip_prefix('d') {
                    days = Some(n.parse().with_context(|| format!("invalid day count '{}'", arg))?);
                } else {
                    selection.push(arg.parse().with_context(|| format!("invalid id '{}'", arg))?);
                }
            }
            TurnRequest::select(selection, days)
        }
        "confirmar" => {
            let intentions = args
                .join(" ")
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            TurnRequest::confirm(intentions, None)
        }
        "limpiar" => TurnRequest::clear(),
        "terminar" => TurnRequest::finish(),
        "ayuda" | "help" => return Ok(Command::Help),
        "salir" | "quit" => return Ok(Command::Quit),
        other => bail!("unknown command '/{}'", other),
    };
    Ok(Command::Turn(request))
}

pub const HELP: &str = "\
Escribe un mensaje, o usa:
  /elegir 1 2 d3     selecciona ids (d3 = 3 días)
  /confirmar [A, B]  confirma las intenciones pendientes o las indicadas
  /limpiar           borra la cotización
  /terminar          registra la cotización
  /salir";

#[cfg(test)]
mod tests {
    use super::*;

    fn request(line: &str) -> TurnRequest {
        match parse_line(line).unwrap() {
            Command::Turn(request) => request,
            _ => panic!("expected a turn for {}", line),
        }
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(request("necesito luces"), TurnRequest::text("necesito luces"));
    }

    #[test]
    fn test_selection_with_days() {
        assert_eq!(request("/elegir 1 2 d3"), TurnRequest::select(vec![1, 2], Some(3)));
        assert!(parse_line("/elegir uno").is_err());
    }

    #[test]
    fn test_confirm_named() {
        assert_eq!(
            request("/confirmar Alquiler, Animación"),
            TurnRequest::confirm(vec!["Alquiler".into(), "Animación".into()], None)
        );
        assert_eq!(request("/confirmar"), TurnRequest::confirm(vec![], None));
    }

    #[test]
    fn test_control_commands() {
        assert_eq!(request("/limpiar"), TurnRequest::clear());
        assert_eq!(request("/terminar"), TurnRequest::finish());
        assert!(matches!(parse_line("/salir").unwrap(), Command::Quit));
        assert!(parse_line("/bailar").is_err());
    }
}
