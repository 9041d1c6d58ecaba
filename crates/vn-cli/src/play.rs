use std::io::{self, BufRead, Write};
use std::path::Path;

use vn_core::{ChoiceOption, EngineEvent, VnError};
use vn_runtime::{Engine, EventRecorder};

use crate::{
    collect_boundary, create_engine_for_script, load_save_file, load_script_file, map_cli_io,
    save_save_file, BoundaryEvent, BoundaryResult, PlayArgs, PlayCommandAction,
    PlayCommandContext, SaveFileV1, SAVE_FILE_SCHEMA,
};

const HELP_LINE: &str = "commands: :help :save :load :restart :env KEY true|false :vars :quit";

pub(crate) fn run_play(args: PlayArgs) -> Result<i32, VnError> {
    let script = load_script_file(&args.script)?;
    let save_file = args
        .save_file
        .unwrap_or_else(|| ".vn/save.json".to_string());
    let context = PlayCommandContext {
        save_file: &save_file,
        script: &script,
        start_label: args.start_label.as_deref(),
    };
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut writer = io::stdout();
    run_play_with_io(&context, &mut reader, &mut writer)
}

pub(crate) fn run_play_with_io(
    context: &PlayCommandContext<'_>,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<i32, VnError> {
    writeln!(writer, "VN player: {}", context.script.title).map_err(map_cli_io)?;
    writeln!(writer, "{}", HELP_LINE).map_err(map_cli_io)?;

    let recorder = EventRecorder::default();
    let mut engine = create_engine_for_script(
        context.script,
        None,
        None,
        context.start_label,
        None,
        &recorder,
    )?;

    loop {
        let boundary = collect_boundary(&engine, &recorder);
        render_boundary(&boundary, writer)?;
        if boundary.event == BoundaryEvent::End {
            writeln!(writer, "[END]").map_err(map_cli_io)?;
            return Ok(0);
        }

        loop {
            let Some(raw) = prompt_input_from("> ", reader, writer)? else {
                return Ok(0);
            };
            let line = raw.trim();
            let action = handle_play_command(line, context, &mut engine, &recorder, writer)?;
            match action {
                PlayCommandAction::Continue => continue,
                PlayCommandAction::RefreshBoundary => break,
                PlayCommandAction::Quit => return Ok(0),
                PlayCommandAction::NotHandled => {}
            }

            match boundary.event {
                BoundaryEvent::Say => {
                    engine.advance()?;
                    break;
                }
                BoundaryEvent::Choice => match resolve_choice(line, &boundary.choices) {
                    Some(label) => {
                        engine.select_choice(&label)?;
                        break;
                    }
                    None => {
                        writeln!(writer, "unknown choice: {}", line).map_err(map_cli_io)?;
                    }
                },
                BoundaryEvent::Stalled | BoundaryEvent::Paused | BoundaryEvent::End => {
                    writeln!(writer, "the story cannot continue; try :restart or :load")
                        .map_err(map_cli_io)?;
                }
            }
        }
    }
}

fn render_boundary(boundary: &BoundaryResult, writer: &mut dyn Write) -> Result<(), VnError> {
    for event in &boundary.events {
        match event {
            EngineEvent::Say { character, text } => {
                writeln!(writer).map_err(map_cli_io)?;
                if character.is_empty() {
                    writeln!(writer, "{}", text).map_err(map_cli_io)?;
                } else {
                    writeln!(writer, "{}: {}", character, text).map_err(map_cli_io)?;
                }
            }
            EngineEvent::Choice { choices } => {
                writeln!(writer).map_err(map_cli_io)?;
                for (index, option) in choices.iter().enumerate() {
                    writeln!(writer, "  [{}] {}", index + 1, option.display).map_err(map_cli_io)?;
                }
            }
            EngineEvent::ShowSprite {
                final_location,
                placement,
            } => {
                writeln!(writer, "[show {} @ {}]", placement.sprite, final_location)
                    .map_err(map_cli_io)?;
            }
            EngineEvent::RemoveSprite { sprite } => {
                writeln!(writer, "[hide {}]", sprite).map_err(map_cli_io)?;
            }
            EngineEvent::Background { path } => {
                writeln!(writer, "[background {}]", path).map_err(map_cli_io)?;
            }
            EngineEvent::AutoSave { label } => {
                writeln!(writer, "[autosave {}]", label).map_err(map_cli_io)?;
            }
            EngineEvent::Finish | EngineEvent::UpdateDebug { .. } => {}
        }
    }
    if boundary.event == BoundaryEvent::Stalled {
        let fault = boundary.fault.as_deref().unwrap_or("unknown");
        writeln!(writer, "[STALLED] {}", fault).map_err(map_cli_io)?;
    }
    Ok(())
}

/// Accepts a 1-based option number or the option's label.
pub(crate) fn resolve_choice(raw: &str, choices: &[ChoiceOption]) -> Option<String> {
    if let Ok(number) = raw.parse::<usize>() {
        return number
            .checked_sub(1)
            .and_then(|index| choices.get(index))
            .map(|option| option.label.clone());
    }
    choices
        .iter()
        .find(|option| option.label == raw)
        .map(|option| option.label.clone())
}

pub(crate) fn handle_play_command(
    raw: &str,
    context: &PlayCommandContext<'_>,
    engine: &mut Engine,
    recorder: &EventRecorder,
    writer: &mut dyn Write,
) -> Result<PlayCommandAction, VnError> {
    let mut parts = raw.split_whitespace();
    match parts.next() {
        Some(":help") => {
            writeln!(writer, "{}", HELP_LINE).map_err(map_cli_io)?;
            Ok(PlayCommandAction::Continue)
        }
        Some(":save") => {
            let save = SaveFileV1 {
                schema_version: SAVE_FILE_SCHEMA.to_string(),
                globals: engine.globals().clone(),
                variables: engine.variables_snapshot(),
            };
            save_save_file(Path::new(context.save_file), &save)?;
            writeln!(writer, "saved: {}", context.save_file).map_err(map_cli_io)?;
            Ok(PlayCommandAction::Continue)
        }
        Some(":load") => {
            let save = load_save_file(Path::new(context.save_file))?;
            recorder.clear();
            *engine = create_engine_for_script(
                context.script,
                Some(save.globals),
                Some(save.variables),
                None,
                None,
                recorder,
            )?;
            writeln!(writer, "loaded: {}", context.save_file).map_err(map_cli_io)?;
            Ok(PlayCommandAction::RefreshBoundary)
        }
        Some(":restart") => {
            let globals = engine.globals().clone();
            recorder.clear();
            *engine = create_engine_for_script(
                context.script,
                Some(globals),
                None,
                context.start_label,
                None,
                recorder,
            )?;
            writeln!(writer, "restarted").map_err(map_cli_io)?;
            Ok(PlayCommandAction::RefreshBoundary)
        }
        Some(":env") => {
            let key = parts.next();
            let value = parts.next().and_then(|raw| raw.parse::<bool>().ok());
            match (key, value) {
                (Some(key), Some(value)) => match engine.set_environment(key, value) {
                    Ok(()) => writeln!(writer, "env {}={}", key, value).map_err(map_cli_io)?,
                    Err(error) => writeln!(writer, "error: {}", error).map_err(map_cli_io)?,
                },
                _ => writeln!(writer, "usage: :env KEY true|false").map_err(map_cli_io)?,
            }
            Ok(PlayCommandAction::Continue)
        }
        Some(":vars") => {
            let environment = serde_json::to_string(engine.environment())
                .map_err(crate::map_cli_output_encode)?;
            let globals =
                serde_json::to_string(engine.globals()).map_err(crate::map_cli_output_encode)?;
            let variables = serde_json::to_string(&engine.variables_snapshot())
                .map_err(crate::map_cli_output_encode)?;
            writeln!(writer, "environment: {}", environment).map_err(map_cli_io)?;
            writeln!(writer, "globals: {}", globals).map_err(map_cli_io)?;
            writeln!(writer, "variables: {}", variables).map_err(map_cli_io)?;
            Ok(PlayCommandAction::Continue)
        }
        Some(":quit") => {
            writeln!(writer, "bye").map_err(map_cli_io)?;
            Ok(PlayCommandAction::Quit)
        }
        _ => Ok(PlayCommandAction::NotHandled),
    }
}

/// Reads one line. `None` at end of input.
pub(crate) fn prompt_input_from(
    prefix: &str,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<Option<String>, VnError> {
    write!(writer, "{}", prefix).map_err(map_cli_io)?;
    writer.flush().map_err(map_cli_io)?;
    let mut input = String::new();
    let read = reader.read_line(&mut input).map_err(map_cli_io)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim_end_matches(&['\r', '\n'][..]).to_string()))
}
