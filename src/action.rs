use crate::error::Result;
use crate::location::Location;
use crate::types::{Movie, MovieDetail, Paged, Rating};

/// Text prompt shown in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    Search(String),
    GoToPage(String),
}

impl Prompt {
    pub fn text(&self) -> &str {
        match self {
            Prompt::Search(text) | Prompt::GoToPage(text) => text,
        }
    }
}

#[derive(Debug)]
pub enum Action {
    Quit,
    Back,
    ScrollUp,
    ScrollDown,
    Select,

    // Pagination. These resolve to a `Navigate` or to nothing.
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    GoToPage(u32),

    /// Move to a new location, recording the current one for Back. All
    /// user navigation funnels through here.
    Navigate(Location),
    /// Re-run the loader for the current location (also the initial mount)
    Refresh,
    OpenRatings,

    // Prompts
    EnterSearchMode,
    EnterGoToMode,
    PromptInput(char),
    PromptBackspace,
    PromptConfirm,
    PromptCancel,

    // Load outcomes, tagged with the token issued when the load started
    MoviesSettled {
        load_id: u64,
        result: Result<Paged<Movie>>,
    },
    SearchSettled {
        load_id: u64,
        result: Result<Vec<Movie>>,
    },
    DetailSettled {
        load_id: u64,
        result: Result<Box<MovieDetail>>,
    },
    RatingsSettled {
        load_id: u64,
        result: Result<Paged<Rating>>,
    },

    None,
}
