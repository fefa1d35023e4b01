use std::cell::Cell;
use std::future::Future;
use std::mem;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc;
use tracing::debug;

use crate::action::{Action, Prompt};
use crate::catalog::{Catalog, SEARCH_LIMIT};
use crate::error::Result;
use crate::event::Event;
use crate::location::{History, Location};
use crate::pagination::PAGE_SIZE;
use crate::reporter::ErrorReporter;
use crate::sync::{PageSync, SettleGuard, Settled, Slot};
use crate::types::{Movie, MovieDetail, Paged, Rating};

pub struct App {
    pub location: Location,
    history: History,

    pub movies: PageSync<Movie>,
    pub search: Slot<Vec<Movie>>,
    pub detail: Slot<MovieDetail>,
    pub ratings: PageSync<Rating>,
    ratings_movie: Option<u64>,

    pub selected: usize,
    pub scroll_offset: usize,
    /// Furthest the detail body can scroll, as of the last frame drawn
    pub detail_max_scroll: Cell<usize>,
    pub prompt: Option<Prompt>,
    pub should_quit: bool,

    catalog: Arc<dyn Catalog>,
    reporter: Arc<dyn ErrorReporter>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        reporter: Arc<dyn ErrorReporter>,
        start: Location,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        Self {
            location: start,
            history: History::default(),

            movies: PageSync::default(),
            search: Slot::default(),
            detail: Slot::default(),
            ratings: PageSync::default(),
            ratings_movie: None,

            selected: 0,
            scroll_offset: 0,
            detail_max_scroll: Cell::new(0),
            prompt: None,
            should_quit: false,

            catalog,
            reporter,
            action_tx,
        }
    }

    /// Whether the view for the current location is waiting on a load
    pub fn loading(&self) -> bool {
        match self.location {
            Location::Movies { .. } => self.movies.state().loading,
            Location::Search { .. } => self.search.is_loading(),
            Location::Movie { .. } => self.detail.is_loading(),
            Location::Ratings { .. } => self.ratings.state().loading,
        }
    }

    /// Movies listed by the current view, if it lists movies
    pub fn listed_movies(&self) -> &[Movie] {
        match self.location {
            Location::Movies { .. } => &self.movies.state().items,
            Location::Search { .. } => self.search.value().map(Vec::as_slice).unwrap_or(&[]),
            _ => &[],
        }
    }

    fn list_len(&self) -> usize {
        match self.location {
            Location::Ratings { .. } => self.ratings.state().items.len(),
            _ => self.listed_movies().len(),
        }
    }

    /// `(page in the location, total pages as last loaded)` for paginated views
    fn page_position(&self) -> Option<(u32, u32)> {
        let total = match self.location {
            Location::Movies { .. } => self.movies.state().total_pages,
            Location::Ratings { .. } => self.ratings.state().total_pages,
            _ => return None,
        };
        Some((self.location.page()?, total))
    }

    fn can_go_to(&self, page: u32) -> bool {
        match self.location {
            Location::Movies { .. } => self.movies.state().can_go_to(page),
            Location::Ratings { .. } => self.ratings.state().can_go_to(page),
            _ => false,
        }
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Init => Action::Refresh,
            Event::Key(key) => self.handle_key(key),
            _ => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        if let Some(prompt) = &self.prompt {
            return match key.code {
                KeyCode::Esc => Action::PromptCancel,
                KeyCode::Enter => Action::PromptConfirm,
                KeyCode::Backspace => Action::PromptBackspace,
                KeyCode::Char(c) => match prompt {
                    Prompt::GoToPage(_) if !c.is_ascii_digit() => Action::None,
                    _ => Action::PromptInput(c),
                },
                _ => Action::None,
            };
        }

        match key.code {
            KeyCode::Char('Q') => Action::Quit,
            KeyCode::Char('q') | KeyCode::Esc => Action::Back,
            KeyCode::Char('m') => Action::Navigate(Location::default()),
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::Enter => Action::Select,
            KeyCode::Char('n') | KeyCode::Char('l') | KeyCode::Right => Action::NextPage,
            KeyCode::Char('p') | KeyCode::Char('h') | KeyCode::Left => Action::PrevPage,
            KeyCode::Char('g') | KeyCode::Home => Action::FirstPage,
            KeyCode::Char('G') | KeyCode::End => Action::LastPage,
            KeyCode::Char(c @ '1'..='9') => Action::GoToPage(c as u32 - '0' as u32),
            KeyCode::Char('/') => Action::EnterSearchMode,
            KeyCode::Char(':') => Action::EnterGoToMode,
            KeyCode::Char('R') => Action::Refresh,
            KeyCode::Char('r') => {
                if matches!(self.location, Location::Movie { .. }) {
                    Action::OpenRatings
                } else {
                    Action::None
                }
            }
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Back => match self.history.pop() {
                Some(previous) => self.set_location(previous),
                None => self.should_quit = true,
            },
            Action::ScrollUp => match self.location {
                Location::Movie { .. } => {
                    self.scroll_offset = self.scroll_offset.saturating_sub(1);
                }
                _ => {
                    self.selected = self.selected.saturating_sub(1);
                }
            },
            Action::ScrollDown => match self.location {
                Location::Movie { .. } => {
                    if self.scroll_offset < self.detail_max_scroll.get() {
                        self.scroll_offset += 1;
                    }
                }
                _ => {
                    let len = self.list_len();
                    if len > 0 && self.selected < len - 1 {
                        self.selected += 1;
                    }
                }
            },
            Action::Select => {
                let id = self.listed_movies().get(self.selected).map(|movie| movie.id);
                if let Some(id) = id {
                    self.navigate(Location::Movie { id });
                }
            }

            Action::NextPage => {
                if let Some((current, _)) = self.page_position() {
                    self.go_to_page(current.saturating_add(1));
                }
            }
            Action::PrevPage => {
                if let Some((current, _)) = self.page_position() {
                    self.go_to_page(current.saturating_sub(1));
                }
            }
            Action::FirstPage => self.go_to_page(1),
            Action::LastPage => {
                if let Some((_, total)) = self.page_position() {
                    self.go_to_page(total);
                }
            }
            Action::GoToPage(page) => self.go_to_page(page),

            Action::Navigate(location) => self.navigate(location),
            Action::Refresh => self.on_location_changed(),
            Action::OpenRatings => {
                if let Location::Movie { id } = self.location {
                    self.navigate(Location::Ratings { id, page: 1 });
                }
            }

            Action::EnterSearchMode => {
                self.prompt = Some(Prompt::Search(String::new()));
            }
            Action::EnterGoToMode => {
                if self.page_position().is_some() {
                    self.prompt = Some(Prompt::GoToPage(String::new()));
                }
            }
            Action::PromptInput(c) => match &mut self.prompt {
                Some(Prompt::Search(text)) | Some(Prompt::GoToPage(text)) => text.push(c),
                None => {}
            },
            Action::PromptBackspace => match &mut self.prompt {
                Some(Prompt::Search(text)) | Some(Prompt::GoToPage(text)) => {
                    text.pop();
                }
                None => {}
            },
            Action::PromptConfirm => match self.prompt.take() {
                Some(Prompt::Search(text)) => {
                    let query = text.trim();
                    if !query.is_empty() {
                        self.navigate(Location::Search {
                            query: query.to_string(),
                        });
                    }
                }
                Some(Prompt::GoToPage(text)) => {
                    if let Ok(page) = text.parse::<u32>() {
                        self.go_to_page(page);
                    }
                }
                None => {}
            },
            Action::PromptCancel => {
                self.prompt = None;
            }

            Action::MoviesSettled { load_id, result } => {
                let settled = self
                    .movies
                    .settle(load_id, result, self.reporter.as_ref(), "list movies");
                if matches!(self.location, Location::Movies { .. }) {
                    let shown_page = self.movies.state().current_page;
                    self.after_page_settled(settled, shown_page);
                }
            }
            Action::SearchSettled { load_id, result } => {
                let settled =
                    self.search
                        .settle(load_id, result, self.reporter.as_ref(), "search movies");
                if settled == Settled::Applied && matches!(self.location, Location::Search { .. }) {
                    self.scroll_to_top();
                }
            }
            Action::DetailSettled { load_id, result } => {
                let settled = self.detail.settle(
                    load_id,
                    result.map(|detail| *detail),
                    self.reporter.as_ref(),
                    "movie detail",
                );
                if settled == Settled::Applied && matches!(self.location, Location::Movie { .. }) {
                    self.scroll_to_top();
                }
            }
            Action::RatingsSettled { load_id, result } => {
                let settled =
                    self.ratings
                        .settle(load_id, result, self.reporter.as_ref(), "movie ratings");
                if matches!(self.location, Location::Ratings { .. }) {
                    let shown_page = self.ratings.state().current_page;
                    self.after_page_settled(settled, shown_page);
                }
            }

            Action::None => {}
        }
    }

    /// Pagination controls end up here. Out-of-range pages and the page
    /// already shown are ignored; anything else becomes a location change.
    fn go_to_page(&mut self, page: u32) {
        if !self.can_go_to(page) {
            return;
        }
        if self.location.page() == Some(page) {
            return;
        }
        let target = self.location.with_page(page);
        self.navigate(target);
    }

    fn navigate(&mut self, location: Location) {
        if location == self.location {
            return;
        }
        let previous = mem::replace(&mut self.location, location);
        let previous_kind = mem::discriminant(&previous);
        self.history.push(previous);
        self.after_location_change(previous_kind);
    }

    /// Location change that does not record history (Back)
    fn set_location(&mut self, location: Location) {
        let previous = mem::replace(&mut self.location, location);
        self.after_location_change(mem::discriminant(&previous));
    }

    fn after_location_change(&mut self, previous_kind: mem::Discriminant<Location>) {
        self.prompt = None;
        if previous_kind != mem::discriminant(&self.location) {
            self.scroll_to_top();
        }
        self.on_location_changed();
    }

    fn after_page_settled(&mut self, settled: Settled, shown_page: u32) {
        match settled {
            Settled::Applied => {
                self.sync_location_page(shown_page);
                self.scroll_to_top();
            }
            Settled::OutOfRange { last_page } => self.load_last_page(last_page),
            Settled::Failed | Settled::Stale => {}
        }
    }

    /// Keep the location on the page the server actually served.
    fn sync_location_page(&mut self, page: u32) {
        if self.location.page().is_some_and(|p| p != page) {
            self.location = self.location.with_page(page);
        }
    }

    /// The requested page is past the end. Load the last page in its place;
    /// the out-of-range location never becomes a history entry.
    fn load_last_page(&mut self, last_page: u32) {
        if self.location.page() == Some(last_page) {
            return;
        }
        debug!(location = %self.location, last_page, "page past the end");
        self.location = self.location.with_page(last_page);
        self.on_location_changed();
    }

    fn scroll_to_top(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    /// The single loader: whatever changed the location, this fetches the
    /// data behind it.
    fn on_location_changed(&mut self) {
        debug!(location = %self.location, "location changed");
        match self.location.clone() {
            Location::Movies { page } => {
                let load_id = self.movies.begin();
                let catalog = Arc::clone(&self.catalog);
                let guard = SettleGuard::new(
                    load_id,
                    self.deliver::<Paged<Movie>>(|load_id, result| Action::MoviesSettled {
                        load_id,
                        result,
                    }),
                );
                spawn_settled(guard, async move { catalog.list_movies(page, PAGE_SIZE).await });
            }
            Location::Search { query } => {
                let load_id = self.search.begin();
                let catalog = Arc::clone(&self.catalog);
                let guard = SettleGuard::new(
                    load_id,
                    self.deliver::<Vec<Movie>>(|load_id, result| Action::SearchSettled {
                        load_id,
                        result,
                    }),
                );
                spawn_settled(guard, async move {
                    catalog.search_movies(&query, SEARCH_LIMIT).await
                });
            }
            Location::Movie { id } => {
                let load_id = self.detail.begin();
                let catalog = Arc::clone(&self.catalog);
                let guard = SettleGuard::new(
                    load_id,
                    self.deliver::<Box<MovieDetail>>(|load_id, result| Action::DetailSettled {
                        load_id,
                        result,
                    }),
                );
                spawn_settled(guard, async move { catalog.get_movie(id).await.map(Box::new) });
            }
            Location::Ratings { id, page } => {
                if self.ratings_movie != Some(id) {
                    self.ratings.clear();
                    self.ratings_movie = Some(id);
                }
                let load_id = self.ratings.begin();
                let catalog = Arc::clone(&self.catalog);
                let guard = SettleGuard::new(
                    load_id,
                    self.deliver::<Paged<Rating>>(|load_id, result| Action::RatingsSettled {
                        load_id,
                        result,
                    }),
                );
                spawn_settled(guard, async move {
                    catalog.list_ratings(id, page, PAGE_SIZE).await
                });
            }
        }
    }

    fn deliver<T: Send + 'static>(
        &self,
        wrap: fn(u64, Result<T>) -> Action,
    ) -> impl FnOnce(u64, Result<T>) + Send + 'static {
        let tx = self.action_tx.clone();
        move |load_id, result| {
            tx.send(wrap(load_id, result)).ok();
        }
    }
}

fn spawn_settled<T, F>(guard: SettleGuard<T>, fetch: F)
where
    T: Send + 'static,
    F: Future<Output = Result<T>> + Send + 'static,
{
    tokio::spawn(async move {
        let result = fetch.await;
        guard.complete(result);
    });
}
