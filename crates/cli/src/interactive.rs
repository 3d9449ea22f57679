//! Interactive session – the terminal stand-in for the harness UI.
//!
//! Three actions bound to editable inputs, plus the latest response of
//! each. Actions are dispatched without waiting; whatever has completed by
//! the next menu render is shown.

use deck_engine::view::ViewInputs;
use deck_engine::{DeckView, ViewSnapshot};
use dialoguer::{Confirm, Input, Select};

const MENU: [&str; 5] = [
    "create deck",
    "open deck",
    "draw cards",
    "refresh responses",
    "quit",
];

pub async fn run_interactive(view: DeckView, base_url: &str) -> anyhow::Result<()> {
    let mut inputs = ViewInputs::default();
    println!("deckctl interactive session against {}", base_url);

    loop {
        println!("{}", render_snapshot(&view.snapshot()));

        let choice = prompt(|| {
            Select::new()
                .with_prompt("action")
                .items(&MENU)
                .default(0)
                .interact()
        })
        .await?;

        match choice {
            0 => {
                inputs = prompt_create(inputs).await?;
                view.spawn_create(inputs.query.clone());
            }
            1 => {
                inputs = prompt_guid(inputs).await?;
                view.spawn_open(inputs.guid.clone());
            }
            2 => {
                inputs = prompt_guid(inputs).await?;
                inputs = prompt_draw_count(inputs).await?;
                view.spawn_draw(inputs.guid.clone(), inputs.draw_query());
            }
            3 => {}
            _ => break,
        }
    }
    Ok(())
}

/// The three response fields as shown under the menu.
pub fn render_snapshot(snapshot: &ViewSnapshot) -> String {
    let show = |s: &Option<String>| s.clone().unwrap_or_default();
    format!(
        "create response: {}\nopen response:   {}\ndraw response:   {}",
        show(&snapshot.create),
        show(&snapshot.open),
        show(&snapshot.draw)
    )
}

// ---------------------------------------------------------------------------
// Prompts – dialoguer blocks, so each runs on the blocking pool and
// in-flight requests keep completing meanwhile.
// ---------------------------------------------------------------------------

async fn prompt<T, F>(f: F) -> anyhow::Result<T>
where
    F: FnOnce() -> Result<T, dialoguer::Error> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await??)
}

async fn prompt_create(mut inputs: ViewInputs) -> anyhow::Result<ViewInputs> {
    let cards = inputs.query.cards.clone();
    inputs.query.cards = prompt(move || {
        Input::<String>::new()
            .with_prompt("cards (e.g. AS,KD; empty for a full deck)")
            .with_initial_text(cards)
            .allow_empty(true)
            .interact_text()
    })
    .await?;

    let shuffled = inputs.query.shuffled;
    inputs.query.shuffled = prompt(move || {
        Confirm::new()
            .with_prompt("shuffled?")
            .default(shuffled)
            .interact()
    })
    .await?;

    let count = inputs.query.count;
    inputs.query.count = prompt(move || {
        Input::<u32>::new()
            .with_prompt("count (0 to omit)")
            .default(count)
            .interact_text()
    })
    .await?;

    Ok(inputs)
}

async fn prompt_guid(mut inputs: ViewInputs) -> anyhow::Result<ViewInputs> {
    let guid = inputs.guid.clone();
    inputs.guid = prompt(move || {
        Input::<String>::new()
            .with_prompt("deck guid")
            .with_initial_text(guid)
            .allow_empty(true)
            .interact_text()
    })
    .await?;
    Ok(inputs)
}

async fn prompt_draw_count(mut inputs: ViewInputs) -> anyhow::Result<ViewInputs> {
    let count = inputs.draw_count;
    inputs.draw_count = prompt(move || {
        Input::<u32>::new()
            .with_prompt("count (0 to omit)")
            .default(count)
            .interact_text()
    })
    .await?;
    Ok(inputs)
}
