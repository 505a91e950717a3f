use chrono::FixedOffset;
use serde::Serialize;
use tracing::error;

use crate::error::Result;
use crate::message_database::Messages;
use crate::render::{render_messages, Board, Filter, Renderer, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterButton {
    pub filter: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Owns the board and its renderer and tracks which filter button is active.
pub struct Controller<R> {
    board: Board,
    renderer: R,
    active: Filter,
}

impl<R: Renderer> Controller<R> {
    pub fn new(renderer: R, offset: FixedOffset) -> Controller<R> {
        Controller {
            board: Board::new(Vec::new(), offset),
            renderer,
            active: Filter::All,
        }
    }

    /// Installs freshly loaded messages and renders the `all` filter.
    pub fn start(&mut self, messages: Messages) -> Result<()> {
        self.board.replace(messages);
        self.click(Filter::All)
    }

    /// Renders `filter` and makes its button the active one. A failed render
    /// leaves the container in the error state and the active button as it
    /// was.
    pub fn click(&mut self, filter: Filter) -> Result<()> {
        match render_messages(&self.board, filter, &mut self.renderer) {
            Ok(()) => {
                self.active = filter;
                Ok(())
            }
            Err(e) => {
                error!(filter = %filter, error = %e, "Failed to render messages");
                if let Err(e) = self.renderer.render(&View::Failed) {
                    error!(error = %e, "Failed to render error notice");
                }
                Err(e)
            }
        }
    }

    pub fn active(&self) -> Filter {
        self.active
    }

    pub fn buttons(&self) -> Vec<FilterButton> {
        Filter::ALL
            .iter()
            .map(|&f| FilterButton {
                filter: f.name(),
                label: f.label(),
                active: f == self.active,
            })
            .collect()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}
