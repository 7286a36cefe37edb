//! Editor sessions bound to the API
//!
//! A `BoardSession` opens a stored board into a `BoardEditor`, and saves it
//! back with a single replace request.

use hopeboard_core::{Board, BoardEditor, Canvas};
use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::{ClientError, ClientResult};

/// Message shown to people when a save does not go through
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save board. Please try again.";

/// A failed save. Displays the user-facing message; the cause is the source.
#[derive(Debug, thiserror::Error)]
#[error("Failed to save board. Please try again.")]
pub struct SaveError {
    #[source]
    pub cause: ClientError,
}

/// An open board: the editor plus the board's id on the server
#[derive(Debug)]
pub struct BoardSession {
    id: Uuid,
    editor: BoardEditor,
}

impl BoardSession {
    /// Fetch a board and open it. Edit mode is granted only when asked for
    /// and the logged-in caller owns the board.
    pub async fn open(
        client: &ApiClient,
        id: Uuid,
        want_edit: bool,
        canvas: Canvas,
    ) -> ClientResult<Self> {
        let board = client.get_board(id).await?;
        let editable = want_edit && Self::owns(client, &board).await?;
        if want_edit && !editable {
            tracing::info!(board_id = %id, "opening board read-only");
        }
        Ok(Self::from_board(board, editable, canvas))
    }

    /// Open a public board from its share token, read-only
    pub async fn open_shared(client: &ApiClient, share_token: &str, canvas: Canvas) -> ClientResult<Self> {
        let board = client.shared_board(share_token).await?;
        Ok(Self::from_board(board, false, canvas))
    }

    /// Create a board on the server and open it for editing
    pub async fn create(client: &ApiClient, title: Option<&str>, canvas: Canvas) -> ClientResult<Self> {
        let board = client.create_board(title).await?;
        tracing::info!(board_id = %board.id, "created board");
        Ok(Self::from_board(board, true, canvas))
    }

    fn from_board(board: Board, editable: bool, canvas: Canvas) -> Self {
        Self {
            id: board.id,
            editor: BoardEditor::open(board, canvas, editable),
        }
    }

    async fn owns(client: &ApiClient, board: &Board) -> ClientResult<bool> {
        Ok(client
            .check_auth()
            .await?
            .is_some_and(|user| board.is_owned_by(user.id)))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn editor(&self) -> &BoardEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut BoardEditor {
        &mut self.editor
    }

    /// Send the editor's state as one PUT and reload the stored result.
    pub async fn save(&mut self, client: &ApiClient) -> Result<&Board, SaveError> {
        if !self.editor.is_editable() {
            return Err(SaveError {
                cause: ClientError::Config("board is open read-only".into()),
            });
        }

        let request = self.editor.save_request();
        match client.save_board(self.id, &request).await {
            Ok(saved) => {
                self.editor.load(saved);
                Ok(self.editor.board())
            }
            Err(cause) => {
                tracing::warn!(board_id = %self.id, error = %cause, "save failed");
                Err(SaveError { cause })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_error_shows_generic_message() {
        let err = SaveError {
            cause: ClientError::Network("connection refused".into()),
        };
        assert_eq!(err.to_string(), SAVE_FAILED_MESSAGE);
        assert!(std::error::Error::source(&err).is_some());
    }
}
