use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, warn};

use super::{
    api::ApiClient,
    input::{self, Command, HELP},
    state::{Effect, Event, Model},
    view, ClientConfig,
};

/// Carries out effects on spawned tasks and reports back as events.
///
/// Requests are not sequenced: a slow fetch that completes after a newer one
/// still overwrites the list.
#[derive(Clone)]
pub struct Executor {
    api: ApiClient,
    page_limit: i64,
    events: UnboundedSender<Event>,
}

impl Executor {
    pub fn new(api: ApiClient, page_limit: i64, events: UnboundedSender<Event>) -> Self {
        Self {
            api,
            page_limit,
            events,
        }
    }

    pub fn spawn(&self, effect: Effect) {
        let this = self.clone();
        tokio::spawn(async move {
            let event = this.execute(effect).await;
            // the receiver is gone once the user quits
            let _ = this.events.send(event);
        });
    }

    pub async fn execute(&self, effect: Effect) -> Event {
        match effect {
            Effect::FetchPage(page) => match self.api.list(page, self.page_limit).await {
                Ok(page) => Event::FetchSucceeded(page),
                Err(e) => {
                    warn!(error = %e, page, "error fetching contacts");
                    Event::FetchFailed
                }
            },
            Effect::CreateContact(form) => match self.api.create(&form.to_request()).await {
                Ok(contact) => {
                    debug!(contact_id = %contact.id, "contact saved");
                    Event::SubmitSucceeded
                }
                Err(e) => {
                    warn!(error = %e, "error saving contact");
                    Event::SubmitFailed
                }
            },
            Effect::DeleteContact(id) => match self.api.delete(id).await {
                Ok(_) => Event::DeleteSucceeded,
                Err(e) => {
                    warn!(error = %e, contact_id = %id, "error deleting contact");
                    Event::DeleteFailed
                }
            },
            Effect::ExpireBanner { generation, after } => {
                tokio::time::sleep(after).await;
                Event::BannerExpired(generation)
            }
        }
    }
}

/// Outcome of one input line.
#[derive(Debug)]
pub enum Action {
    Dispatch(Event),
    Notice(String),
    Quit,
}

/// Maps a parsed command to an event against the current model. A pending
/// delete confirmation only accepts `yes` or `no`.
pub fn command_action(model: &Model, cmd: Command) -> Action {
    if model.pending_delete.is_some() {
        return match cmd {
            Command::Yes => Action::Dispatch(Event::DeleteConfirmed),
            Command::No => Action::Dispatch(Event::DeleteCancelled),
            Command::Quit => Action::Quit,
            _ => Action::Notice("answer `yes` or `no` first".into()),
        };
    }

    match cmd {
        Command::Edit(field, value) => Action::Dispatch(Event::FieldEdited(field, value)),
        Command::Add => Action::Dispatch(Event::Submit),
        Command::Delete(n) => match n.checked_sub(1).and_then(|i| model.contacts.get(i)) {
            Some(c) => Action::Dispatch(Event::DeleteRequested(c.id)),
            None => Action::Notice(format!("no contact #{n} on this page")),
        },
        Command::Yes | Command::No => Action::Notice("nothing to confirm".into()),
        Command::Next => Action::Dispatch(Event::NextPage),
        Command::Prev => Action::Dispatch(Event::PrevPage),
        Command::Refresh => Action::Dispatch(Event::Refresh),
        Command::Help => Action::Notice(HELP.into()),
        Command::Quit => Action::Quit,
    }
}

pub async fn run(config: ClientConfig) -> anyhow::Result<()> {
    run_with(
        config,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
}

pub async fn run_with<R, W>(config: ClientConfig, reader: R, mut output: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    let executor = Executor::new(ApiClient::new(&config.api_url), config.page_limit, tx);
    let mut model = Model::new(config.banner_ttl);
    let mut lines = reader.lines();
    // requests spawned but not yet reported back; banner timers are not counted
    let mut in_flight = dispatch(&mut model, &executor, Event::Started);
    let mut input_open = true;

    draw(&mut output, &model, None).await?;

    // after EOF or `quit`, keep going until every request has reported back
    while input_open || in_flight > 0 {
        tokio::select! {
            line = lines.next_line(), if input_open => {
                let Some(line) = line? else {
                    input_open = false;
                    continue;
                };
                let notice = match input::parse(&line) {
                    Ok(None) => None,
                    Ok(Some(cmd)) => match command_action(&model, cmd) {
                        Action::Dispatch(event) => {
                            in_flight += dispatch(&mut model, &executor, event);
                            None
                        }
                        Action::Notice(text) => Some(text),
                        Action::Quit => {
                            input_open = false;
                            continue;
                        }
                    },
                    Err(e) => Some(e.to_string()),
                };
                draw(&mut output, &model, notice.as_deref()).await?;
            }
            Some(event) = rx.recv() => {
                if !matches!(event, Event::BannerExpired(_)) {
                    in_flight = in_flight.saturating_sub(1);
                }
                in_flight += dispatch(&mut model, &executor, event);
                draw(&mut output, &model, None).await?;
            }
        }
    }
    Ok(())
}

/// Applies the event and spawns its effects. Returns how many of them are
/// requests that will report back.
fn dispatch(model: &mut Model, executor: &Executor, event: Event) -> usize {
    debug!(?event, "event");
    let mut requests = 0;
    for effect in model.update(event) {
        if !matches!(effect, Effect::ExpireBanner { .. }) {
            requests += 1;
        }
        executor.spawn(effect);
    }
    requests
}

async fn draw<W: AsyncWrite + Unpin>(
    output: &mut W,
    model: &Model,
    notice: Option<&str>,
) -> std::io::Result<()> {
    let mut screen = view::render(model);
    if let Some(text) = notice {
        screen.push_str(text);
        screen.push('\n');
    }
    screen.push_str("> ");
    output.write_all(b"\n").await?;
    output.write_all(screen.as_bytes()).await?;
    output.flush().await
}
