use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::actions::{Action, OpenedDocument, PageDirection, Panel};
use crate::chat::{ChatAssistant, ChatSession};
use crate::config::ReaderConfig;
use crate::error::ReaderError;
use crate::extractor::{LopdfExtractor, TextExtractor};
use crate::log_error;
use crate::reconstruct::{reconstruct_page, ReconstructedPage};
use crate::request::RequestToken;
use crate::selection::ActionHandler;
use crate::state::{PageText, UiState, ViewerState};

/// Owns the viewer state and runs the async work the state asks for.
///
/// Every change goes through [`ReaderApp::dispatch`]. Background tasks (document
/// loads, page extraction, chat replies) report back by sending an [`Action`] on
/// the app channel; completions carrying a superseded token are dropped.
pub struct ReaderApp {
    state: ViewerState,
    config: ReaderConfig,
    assistant: Arc<dyn ChatAssistant>,
    tx: UnboundedSender<Action>,
    rx: UnboundedReceiver<Action>,
}

impl ReaderApp {
    pub fn new(config: ReaderConfig, assistant: Arc<dyn ChatAssistant>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: ViewerState::new(),
            config,
            assistant,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn sender(&self) -> UnboundedSender<Action> {
        self.tx.clone()
    }

    pub fn should_quit(&self) -> bool {
        self.state.ui.should_quit
    }

    /// Waits for the next background completion
    pub async fn next_action(&mut self) -> Option<Action> {
        self.rx.recv().await
    }

    /// Applies every completion already queued, returns how many were applied
    pub fn drain_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(action) = self.rx.try_recv() {
            self.dispatch(action);
            applied += 1;
        }
        applied
    }

    /// Shows an already opened document, bypassing the file loader
    pub fn attach_document(&mut self, extractor: Arc<dyn TextExtractor>) {
        let token = self.state.document.loads.issue();
        self.dispatch(Action::DocumentOpened {
            token,
            document: OpenedDocument(extractor),
        });
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::OpenDocument(path) => self.open_document(path),
            Action::ReloadDocument => match self.state.document.path() {
                Some(path) => self.open_document(path),
                None => self.report_no_document("reload"),
            },
            Action::DocumentOpened { token, document } => self.document_opened(token, document),
            Action::DocumentFailed { token, message } => {
                if !self.state.document.loads.complete(token) {
                    debug!("Discarding stale document failure {}", token);
                    return;
                }
                self.state.ui.set_error(message);
                self.state.ui.set_status("Failed to open PDF");
            }
            Action::NavigatePage(direction) => self.navigate(direction),
            Action::PageExtracted {
                token,
                page,
                result,
            } => self.page_extracted(token, page, result),

            Action::BeginSelection => self.state.selection.begin_selection(),
            Action::FinishSelection {
                text,
                selection,
                region,
            } => {
                self.state.selection.finish_selection(&text, selection, region);
            }
            Action::DismissMenu => self.state.selection.dismiss(),
            Action::TriggerAction(kind) => {
                let mut handler = StudyActions {
                    chat: &mut self.state.chat,
                    ui: &mut self.state.ui,
                };
                self.state.selection.trigger(kind, &mut handler);
            }

            Action::ChatInput(c) => self.state.chat.push_input(c),
            Action::ChatBackspace => self.state.chat.pop_input(),
            Action::SetChatInput(text) => self.state.chat.set_input(text),
            Action::SendChat => self.send_chat(),
            Action::ChatReplied { token, content } => {
                self.state.chat.receive_reply(token, content);
            }

            Action::SwitchPanel(panel) => self.state.ui.focused_panel = panel,
            Action::ScrollPage(delta) => {
                let line_count = self.state.page.lines().len();
                self.state.ui.scroll_page(delta, line_count);
            }
            Action::Quit => {
                info!("Quit requested");
                self.state.ui.should_quit = true;
            }
        }
    }

    fn open_document(&mut self, path: PathBuf) {
        let token = self.state.document.loads.issue();
        info!("📂 Opening {} (request {})", path.display(), token);
        self.state.ui.set_status(format!("Loading {}...", path.display()));

        let tx = self.tx.clone();
        tokio::spawn(async move {
            let opened = tokio::task::spawn_blocking(move || LopdfExtractor::open(&path)).await;
            let action = match opened {
                Ok(Ok(extractor)) => Action::DocumentOpened {
                    token,
                    document: OpenedDocument(Arc::new(extractor)),
                },
                Ok(Err(err)) => {
                    log_error!(err, "document load");
                    Action::DocumentFailed {
                        token,
                        message: err.user_message(),
                    }
                }
                Err(join_err) => {
                    let err = ReaderError::from(
                        anyhow::Error::new(join_err).context("document loader task failed"),
                    );
                    log_error!(err, "document load");
                    Action::DocumentFailed {
                        token,
                        message: err.user_message(),
                    }
                }
            };
            if tx.send(action).is_err() {
                debug!("Viewer closed before document {} finished loading", token);
            }
        });
    }

    fn document_opened(&mut self, token: RequestToken, document: OpenedDocument) {
        if !self.state.document.loads.complete(token) {
            debug!("Discarding stale document load {}", token);
            return;
        }

        let extractor = document.0;
        let page = self
            .state
            .document
            .load(extractor, self.config.viewer.start_page);
        if let Some(info) = self.state.document.info() {
            let status = format!("Loaded {} ({} pages)", info.file_name, info.page_count);
            self.state.ui.set_status(status);
        }
        self.state.ui.clear_error();
        self.state.selection.dismiss();
        self.start_extraction(page);
    }

    fn navigate(&mut self, direction: PageDirection) {
        if !self.state.document.is_loaded() {
            self.report_no_document("navigation");
            return;
        }

        let current = self.state.document.page_number;
        let target = direction.resolve(current, self.state.document.page_count());
        if target == current {
            return;
        }

        debug!("Page {} -> {}", current, target);
        self.state.document.page_number = target;
        self.state.selection.dismiss();
        self.start_extraction(target);
    }

    fn report_no_document(&mut self, context: &str) {
        let err = ReaderError::NoDocument;
        debug!("Ignoring {}: {}", context, err);
        self.state.ui.set_status(err.user_message());
    }

    fn start_extraction(&mut self, page: usize) {
        let Some(extractor) = self.state.document.extractor() else {
            return;
        };

        // supersedes any extraction still running for the previous page
        let token = self.state.page.extractions.issue();
        self.state.page.text = PageText::Loading { page };
        self.state.ui.page_scroll = 0;

        let tx = self.tx.clone();
        tokio::spawn(async move {
            let extracted = tokio::task::spawn_blocking(move || {
                extractor
                    .extract_page(page)
                    .map(|fragments| reconstruct_page(&fragments))
            })
            .await;

            let result = match extracted {
                Ok(Ok(text)) => Ok(text),
                Ok(Err(err)) => {
                    log_error!(err, "page extraction");
                    Err(err.user_message())
                }
                Err(join_err) => {
                    let err = ReaderError::page_extraction(page, join_err.to_string());
                    log_error!(err, "page extraction");
                    Err(err.user_message())
                }
            };

            if tx
                .send(Action::PageExtracted {
                    token,
                    page,
                    result,
                })
                .is_err()
            {
                debug!("Viewer closed before page {} finished extracting", page);
            }
        });
    }

    fn page_extracted(
        &mut self,
        token: RequestToken,
        page: usize,
        result: Result<ReconstructedPage, String>,
    ) {
        if !self.state.page.extractions.complete(token) {
            debug!("Discarding stale extraction {} for page {}", token, page);
            return;
        }

        match result {
            Ok(text) => {
                let stats = text.stats();
                info!(
                    "📄 Page {}: {} lines, {} words, {} characters",
                    page, stats.line_count, stats.word_count, stats.char_count
                );
                self.state.ui.clear_error();
                self.state.page.text = PageText::Ready { page, text };
            }
            Err(message) => {
                self.state.ui.set_error(message.clone());
                self.state.page.text = PageText::Failed { page, message };
            }
        }
    }

    fn send_chat(&mut self) {
        let Some((token, text)) = self.state.chat.send_input() else {
            return;
        };

        let delay: Duration = self.config.chat.reply_delay();
        let assistant = Arc::clone(&self.assistant);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let content = assistant.reply(&text);
            debug!("{} replied to chat request {}", assistant.name(), token);
            if tx.send(Action::ChatReplied { token, content }).is_err() {
                warn!("Viewer closed before chat reply {} arrived", token);
            }
        });
    }
}

/// What each selection action does in this viewer. Only `chat` is wired: it seeds
/// the chat input with the selected text.
struct StudyActions<'a> {
    chat: &'a mut ChatSession,
    ui: &'a mut UiState,
}

impl StudyActions<'_> {
    fn not_available(&mut self, label: &str) {
        debug!("{} action has no handler yet", label);
        self.ui.set_status(format!("{} is not available yet", label));
    }
}

impl ActionHandler for StudyActions<'_> {
    fn explain(&mut self, _text: &str) {
        self.not_available("Explain");
    }

    fn chat(&mut self, text: &str) {
        self.chat.set_input(text);
        self.ui.focused_panel = Panel::Chat;
    }

    fn quiz(&mut self, _text: &str) {
        self.not_available("Quiz");
    }

    fn flashcards(&mut self, _text: &str) {
        self.not_available("Flashcards");
    }
}
