//! Terminal front-ends for each subcommand.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use services::{AppServices, QuizServiceError};
use storage::NewDocument;
use study_core::flashcards::CardFace;
use study_core::model::{DocumentQuery, QuizId, option_label};
use study_core::quiz::{QuizEngine, QuizSessionView};
use tokio::io::{AsyncBufRead, Lines};

//
// ─── QUIZZES ───────────────────────────────────────────────────────────────────
//

pub async fn list_quizzes(app: &AppServices) -> Result<()> {
    let cards = app.quiz_catalog().list_cards().await?;
    if cards.is_empty() {
        println!("No quizzes yet.");
        return Ok(());
    }
    for card in cards {
        let score = card
            .score_percent
            .map(|p| format!("  last score {p}%"))
            .unwrap_or_default();
        println!(
            "[{}] {} ({}, {}){score}\n    {}",
            card.id,
            card.title,
            card.difficulty,
            card.subtitle(),
            card.action_label()
        );
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuizCommand {
    Select(usize),
    Next,
    Back,
    Retake,
    Quit,
}

/// Letters pick options by label, numbers by position; words drive navigation.
fn parse_quiz_command(input: &str) -> Option<QuizCommand> {
    let input = input.trim();
    match input.to_ascii_lowercase().as_str() {
        "next" | "finish" | ">" | "" => return Some(QuizCommand::Next),
        "back" | "prev" | "<" => return Some(QuizCommand::Back),
        "retake" => return Some(QuizCommand::Retake),
        "quit" | "exit" => return Some(QuizCommand::Quit),
        _ => {}
    }
    if let Ok(n) = input.parse::<usize>() {
        return n.checked_sub(1).map(QuizCommand::Select);
    }
    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => {
            Some(QuizCommand::Select(usize::from(c.to_ascii_uppercase() as u8 - b'A')))
        }
        _ => None,
    }
}

fn render_question(view: &QuizSessionView) {
    println!();
    println!("{}  {}  ({}%)", view.title, view.position_label(), view.progress_percent());
    println!("{}", view.prompt);
    for option in &view.options {
        let marker = if option.selected { '●' } else { '○' };
        println!("  {marker} {}. {}", option.label, option.text);
    }
    let back = if view.can_go_back { "back, " } else { "" };
    let choices = view.option_indices();
    println!(
        "Choose {}-{}, then {} (or: {back}quit)",
        option_label(choices.start),
        option_label(choices.end.saturating_sub(1)),
        view.advance_label().to_lowercase()
    );
}

fn render_results(view: &QuizSessionView) {
    if let Some(score) = view.score {
        println!();
        println!("{} finished", view.title);
        println!(
            "Score: {} / {} ({}%)",
            score.correct(),
            score.total(),
            score.percentage()
        );
        println!("Type 'retake' to try again or 'quit' to leave.");
    }
}

pub async fn take_quiz<R>(app: &AppServices, quiz_id: u64, lines: &mut Lines<R>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let quiz_loop = app.quiz_loop();
    let mut engine = QuizEngine::new();
    let mut view = quiz_loop.start(&mut engine, QuizId::new(quiz_id)).await?;

    loop {
        if view.is_terminal {
            render_results(&view);
        } else {
            render_question(&view);
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let Some(command) = parse_quiz_command(&line) else {
            println!("Unrecognised input: {}", line.trim());
            continue;
        };

        let outcome: Result<(), QuizServiceError> = match command {
            QuizCommand::Quit => break,
            QuizCommand::Select(index) => engine.select_answer(index).map_err(Into::into),
            QuizCommand::Back => engine.previous().map(|_| ()).map_err(Into::into),
            QuizCommand::Next => quiz_loop.advance(&mut engine).map(|_| ()),
            QuizCommand::Retake => quiz_loop.retake(&mut engine).map(|_| ()),
        };
        if let Err(err) = outcome {
            println!("{err}");
        }
        view = engine.view().context("quiz session ended unexpectedly")?;
    }

    quiz_loop.exit(&mut engine);
    Ok(())
}

//
// ─── FLASHCARDS ────────────────────────────────────────────────────────────────
//

pub async fn review_flashcards<R>(
    app: &AppServices,
    shuffle: bool,
    lines: &mut Lines<R>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let flashcards = app.flashcards();
    let mut review = flashcards.start_review(shuffle).await?;

    loop {
        let card = review.current_card();
        println!();
        println!("{}  [{} · {}]", review.position_label(), card.topic(), card.difficulty());
        println!("{}: {}", review.face().heading(), review.text());
        println!("(flip, next, prev, shuffle, done)");

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.trim().to_ascii_lowercase().as_str() {
            "flip" | "f" | "" => {
                if review.flip() == CardFace::Answer {
                    tracing::debug!(card = %review.current_card().id(), "answer revealed");
                }
            }
            "next" | "n" => {
                if !review.next() {
                    println!("That was the last card.");
                }
            }
            "prev" | "p" => {
                if !review.previous() {
                    println!("Already at the first card.");
                }
            }
            "shuffle" | "s" => flashcards.shuffle(&mut review),
            "done" | "q" | "quit" => break,
            other => println!("Unrecognised input: {other}"),
        }
    }

    flashcards.end_review(review);
    Ok(())
}

//
// ─── NOTES ─────────────────────────────────────────────────────────────────────
//

pub async fn list_notes(app: &AppServices, query: &str, all: bool) -> Result<()> {
    let query = DocumentQuery::new(query).with_view_all(all);
    let notes = app.notes().list(app.context(), &query).await?;
    if notes.is_empty() {
        println!("No notes found.");
        return Ok(());
    }
    for note in notes {
        println!(
            "[{}] {} ({})",
            note.id,
            note.title,
            note.created_at.format("%Y-%m-%d")
        );
        if !note.summary.is_empty() {
            println!("    {}", note.summary);
        }
        if !note.topics.is_empty() {
            println!("    topics: {}", note.topics.join(", "));
        }
    }
    Ok(())
}

pub async fn upload(app: &AppServices, files: &[PathBuf]) -> Result<()> {
    let mut documents = Vec::with_capacity(files.len());
    for path in files {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("{} has no usable file name", path.display()))?;
        documents.push(NewDocument::from_file(file_name, bytes));
    }

    let report = app.notes().upload(app.context(), documents).await?;
    if !report.all_succeeded() {
        bail!("{} of {} uploads failed", report.failed.len(), files.len());
    }
    Ok(())
}

//
// ─── DASHBOARD ─────────────────────────────────────────────────────────────────
//

pub async fn dashboard(app: &AppServices) -> Result<()> {
    let stats = app.dashboard().stats(app.context()).await?;
    println!("{}", stats.greeting);
    println!("Notes uploaded:    {}", stats.notes_uploaded);
    println!("Quizzes completed: {}", stats.quizzes_completed);
    match stats.average_score {
        Some(avg) => println!("Average score:     {avg}%"),
        None => println!("Average score:     -"),
    }
    Ok(())
}
