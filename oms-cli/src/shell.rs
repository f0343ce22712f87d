//! Interactive menu loop
//!
//! Two states: logged out (Login, Signup, Exit) and logged in (catalog and
//! watchlist actions, plus movie editing for admins). The session lives in a
//! local value for the lifetime of the loop.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use uuid::Uuid;

use crate::client::{hash_password, ApiClient, Reply};
use crate::display::{movie_table, movies_from};

/// Input is read line by line from stdin, so the password is echoed
pub const PASSWORD_PROMPT: &str = "Password (typed text is visible): ";

/// Logged-in user as seen by the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliSession {
    pub token: Uuid,
    pub user_name: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Login,
    Signup,
    Exit,
    Browse,
    Search,
    AddToWatchlist,
    MyWatchlist,
    AddMovie,
    UpdateMovie,
    DeleteMovie,
    Logout,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Action::Login => "Login",
            Action::Signup => "Signup",
            Action::Exit => "Exit",
            Action::Browse => "Browse movies",
            Action::Search => "Search for a movie",
            Action::AddToWatchlist => "Add a movie to my watchlist",
            Action::MyWatchlist => "Show my watchlist",
            Action::AddMovie => "Add a movie",
            Action::UpdateMovie => "Update a movie",
            Action::DeleteMovie => "Delete a movie",
            Action::Logout => "Logout",
        }
    }
}

/// Menu entries for the current state
pub fn menu_for(session: Option<&CliSession>) -> Vec<Action> {
    let Some(session) = session else {
        return vec![Action::Login, Action::Signup, Action::Exit];
    };

    let mut actions = vec![
        Action::Browse,
        Action::Search,
        Action::AddToWatchlist,
        Action::MyWatchlist,
    ];
    if session.is_admin {
        actions.extend([Action::AddMovie, Action::UpdateMovie, Action::DeleteMovie]);
    }
    actions.push(Action::Logout);
    actions
}

/// Map a typed menu choice (1-based) to an action
pub fn parse_choice(input: &str, actions: &[Action]) -> Option<Action> {
    let index: usize = input.trim().parse().ok()?;
    index.checked_sub(1).and_then(|i| actions.get(i)).copied()
}

/// Line-oriented prompt reader
pub struct Prompter<R> {
    lines: Lines<R>,
}

impl Prompter<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> Prompter<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Print `label` and read one trimmed line; `None` at end of input
    pub async fn ask(&mut self, label: &str) -> Result<Option<String>> {
        print!("{}", label);
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let line = self
            .lines
            .next_line()
            .await
            .context("Failed to read input")?;
        Ok(line.map(|l| l.trim().to_string()))
    }
}

/// Run the interactive loop until Exit or end of input
pub async fn run(client: &ApiClient) -> Result<()> {
    let mut prompter = Prompter::stdin();
    let mut session: Option<CliSession> = None;

    println!("Welcome to the Online Movie Store!");

    loop {
        let actions = menu_for(session.as_ref());
        println!();
        if let Some(session) = &session {
            println!("Logged in as {}", session.user_name);
        }
        for (i, action) in actions.iter().enumerate() {
            println!("  {}. {}", i + 1, action.label());
        }

        let Some(input) = prompter.ask("Choose an option: ").await? else {
            break;
        };
        let Some(action) = parse_choice(&input, &actions) else {
            println!("Invalid option, please try again.");
            continue;
        };
        if action == Action::Exit {
            break;
        }

        // Network failures are reported and the loop carries on
        if let Err(e) = perform(client, &mut prompter, &mut session, action).await {
            eprintln!("Error: {:#}", e);
        }
    }

    println!("Goodbye!");
    Ok(())
}

async fn perform<R: AsyncBufRead + Unpin>(
    client: &ApiClient,
    prompter: &mut Prompter<R>,
    session: &mut Option<CliSession>,
    action: Action,
) -> Result<()> {
    let token = session.as_ref().map(|s| s.token);

    match action {
        Action::Login | Action::Signup => {
            let Some(user_name) = prompter.ask("Username: ").await? else {
                return Ok(());
            };
            let Some(password) = prompter.ask(PASSWORD_PROMPT).await? else {
                return Ok(());
            };
            let path = if action == Action::Login { "login" } else { "signup" };
            let body = json!({
                "user_name": user_name,
                "password_hash": hash_password(&password),
            });

            let reply = client.post(&[path], &body, None).await?;
            if let Reply::Success { body, .. } = &reply {
                *session = session_from(&user_name, body);
            }
            show(&reply);
        }
        Action::Logout => {
            if token.is_some() {
                let reply = client.post(&["logout"], &json!({}), token).await?;
                show(&reply);
            }
            *session = None;
        }
        Action::Browse => show(&client.get(&["movies"], token).await?),
        Action::MyWatchlist => show(&client.get(&["watchlist"], token).await?),
        Action::Search => {
            if let Some(title) = ask_title(prompter).await? {
                show(&client.get(&["readmovie", title.as_str()], token).await?);
            }
        }
        Action::AddToWatchlist => {
            if let Some(title) = ask_title(prompter).await? {
                show(&client.get(&["towatchlist", title.as_str()], token).await?);
            }
        }
        Action::AddMovie => {
            if let Some(title) = ask_title(prompter).await? {
                let cast = prompter.ask("Cast: ").await?.unwrap_or_default();
                let category = prompter.ask("Category: ").await?.unwrap_or_default();
                let body = json!({ "title": title, "cast": cast, "category": category });
                show(&client.post(&["addmovie"], &body, token).await?);
            }
        }
        Action::UpdateMovie => {
            if let Some(title) = ask_title(prompter).await? {
                let new_title = prompter
                    .ask("New title (blank to keep): ")
                    .await?
                    .unwrap_or_default();
                let cast = prompter.ask("Cast: ").await?.unwrap_or_default();
                let category = prompter.ask("Category: ").await?.unwrap_or_default();
                let body = json!({
                    "title": title,
                    "new_title": new_title,
                    "cast": cast,
                    "category": category,
                });
                show(&client.post(&["updatemovie"], &body, token).await?);
            }
        }
        Action::DeleteMovie => {
            if let Some(title) = ask_title(prompter).await? {
                show(&client.delete(&["deletemovie", title.as_str()], token).await?);
            }
        }
        Action::Exit => {}
    }

    Ok(())
}

async fn ask_title<R: AsyncBufRead + Unpin>(prompter: &mut Prompter<R>) -> Result<Option<String>> {
    Ok(prompter
        .ask("Movie title: ")
        .await?
        .filter(|title| !title.is_empty()))
}

/// Session from a successful login/signup reply
fn session_from(user_name: &str, body: &Value) -> Option<CliSession> {
    let token = body.get("token")?.as_str()?.parse().ok()?;
    Some(CliSession {
        token,
        user_name: user_name.to_string(),
        is_admin: body.get("is_admin").and_then(Value::as_bool).unwrap_or(false),
    })
}

/// Print a reply, rendering any movie payload as a table
fn show(reply: &Reply) {
    match reply {
        Reply::Success { message, body } => {
            println!("{}", message.trim_end());
            let payload = body.get("list").or_else(|| body.get("movie"));
            if let Some(payload) = payload {
                let movies = movies_from(payload);
                if !movies.is_empty() {
                    println!("{}", movie_table(&movies));
                }
            }
        }
        Reply::Conflict(message) => println!("{}", message),
        Reply::Error(message) => println!("Error: {}", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(is_admin: bool) -> CliSession {
        CliSession {
            token: Uuid::new_v4(),
            user_name: "nina".to_string(),
            is_admin,
        }
    }

    #[test]
    fn test_menu_logged_out() {
        assert_eq!(
            menu_for(None),
            vec![Action::Login, Action::Signup, Action::Exit]
        );
    }

    #[test]
    fn test_menu_user_and_admin() {
        let user = menu_for(Some(&session(false)));
        assert!(!user.contains(&Action::AddMovie));
        assert_eq!(user.last(), Some(&Action::Logout));

        let admin = menu_for(Some(&session(true)));
        assert!(admin.contains(&Action::AddMovie));
        assert!(admin.contains(&Action::UpdateMovie));
        assert!(admin.contains(&Action::DeleteMovie));
        assert_eq!(admin.len(), user.len() + 3);
    }

    #[test]
    fn test_password_prompt_warns_about_echo() {
        assert!(PASSWORD_PROMPT.starts_with("Password"));
        assert!(PASSWORD_PROMPT.contains("visible"));
    }

    #[test]
    fn test_parse_choice() {
        let actions = menu_for(None);
        assert_eq!(parse_choice("1", &actions), Some(Action::Login));
        assert_eq!(parse_choice(" 3 ", &actions), Some(Action::Exit));
        assert_eq!(parse_choice("0", &actions), None);
        assert_eq!(parse_choice("4", &actions), None);
        assert_eq!(parse_choice("login", &actions), None);
    }

    #[test]
    fn test_session_from_reply() {
        let token = Uuid::new_v4();
        let body = json!({
            "success": "User authenticated.",
            "is_admin": true,
            "token": token.to_string(),
            "watchlist_id": 4,
        });
        let session = session_from("root", &body).unwrap();
        assert_eq!(session.token, token);
        assert!(session.is_admin);

        assert!(session_from("root", &json!({ "success": "ok" })).is_none());
    }

    #[tokio::test]
    async fn test_prompter_reads_trimmed_lines() {
        let input: &[u8] = b"  2 \nheat\n";
        let mut prompter = Prompter::new(input);

        assert_eq!(prompter.ask("> ").await.unwrap().as_deref(), Some("2"));
        assert_eq!(prompter.ask("> ").await.unwrap().as_deref(), Some("heat"));
        assert_eq!(prompter.ask("> ").await.unwrap(), None);
    }
}
