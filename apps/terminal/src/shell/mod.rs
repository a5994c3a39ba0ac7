//! # Kiosk Shell
//!
//! Line-oriented screen for the clerk: a persistent header, one page body,
//! and the footer navigation.
//!
//! ## Screen Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  『イベント名称』専用購入アプリ                       ◄── header          │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Home      : chips, scan / manual entry, code panel, purchase list     │
//! │  History   : static past purchases                                     │
//! │  My Page   : static member profile                                     │
//! │                                                                         │
//! │  + at most one modal (scanner / confirm / receipt / error / detail)    │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  [1] ▶ホーム画面   [2] 過去購入履歴   [3] マイページ   ◄── footer nav    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The only state the shell owns is the current route (plus which list entry
//! is open in the detail view). Everything about the purchase lives in the
//! [`WorkflowController`].

mod history;
mod home;
mod mypage;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use eventpos_core::{CoreError, Event, Modal, WorkflowState};

use crate::controller::WorkflowController;
use crate::error::{AppError, AppResult, ErrorCode};

const RULE: &str = "==================================================";
const THIN_RULE: &str = "--------------------------------------------------";

// =============================================================================
// Routes & Commands
// =============================================================================

/// Footer navigation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    History,
    MyPage,
}

impl Route {
    pub const ALL: [Route; 3] = [Route::Home, Route::History, Route::MyPage];

    pub fn label(&self) -> &'static str {
        match self {
            Route::Home => "ホーム画面",
            Route::History => "過去購入履歴",
            Route::MyPage => "マイページ",
        }
    }
}

/// One line of clerk input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Navigate(Route),
    Scan,
    Cancel,
    Manual,
    Search(String),
    Add,
    Buy,
    Yes,
    Ok,
    Received,
    /// Zero-based purchase list index.
    Detail(usize),
    Help,
    Quit,
    /// Not a command: a wedge scan, a manual code, or a typo.
    Text(String),
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match (word.to_lowercase().as_str(), rest) {
            ("1" | "home", "") => Command::Navigate(Route::Home),
            ("2" | "history", "") => Command::Navigate(Route::History),
            ("3" | "mypage", "") => Command::Navigate(Route::MyPage),
            ("s" | "scan", "") => Command::Scan,
            ("c" | "cancel" | "n" | "no", "") => Command::Cancel,
            ("m" | "manual", "") => Command::Manual,
            ("f" | "search", code) => Command::Search(code.to_string()),
            ("a" | "add", "") => Command::Add,
            ("b" | "buy", "") => Command::Buy,
            ("y" | "yes", "") => Command::Yes,
            ("o" | "ok", "") => Command::Ok,
            ("r" | "received", "") => Command::Received,
            ("d" | "detail", n) => match n.parse::<usize>() {
                Ok(n) if n >= 1 => Command::Detail(n - 1),
                _ => Command::Text(line.to_string()),
            },
            ("h" | "help" | "?", "") => Command::Help,
            ("q" | "quit" | "exit", "") => Command::Quit,
            _ => Command::Text(line.to_string()),
        }
    }
}

/// Whether the input loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

// =============================================================================
// Shell
// =============================================================================

pub struct Shell {
    title: String,
    route: Route,
    controller: WorkflowController,
    detail: Option<usize>,
    notice: Option<String>,
    show_help: bool,
}

impl Shell {
    pub fn new(title: impl Into<String>, controller: WorkflowController) -> Self {
        Shell {
            title: title.into(),
            route: Route::Home,
            controller,
            detail: None,
            notice: None,
            show_help: false,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn controller(&self) -> &WorkflowController {
        &self.controller
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Reads clerk input and device output until `quit` or end of input.
    pub async fn run(mut self) -> AppResult<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        println!("{}", self.render());

        loop {
            tokio::select! {
                line = lines.next_line() => match line? {
                    Some(line) => {
                        if self.handle_line(&line).await == Flow::Quit {
                            break;
                        }
                    }
                    None => break,
                },
                scan = self.controller.next_scan() => {
                    self.notice = self.controller.handle_scan(scan).await.map(|e| e.message);
                }
            }
            println!("{}", self.render());
        }

        info!("Terminal shell stopped");
        Ok(())
    }

    // =========================================================================
    // Input
    // =========================================================================

    pub async fn handle_line(&mut self, line: &str) -> Flow {
        self.notice = None;
        self.show_help = false;

        let command = Command::parse(line);
        debug!(?command, route = ?self.route, "Clerk input");

        match command {
            Command::Quit => return Flow::Quit,
            Command::Help => self.show_help = true,
            Command::Navigate(route) => self.navigate(route).await,
            _ if self.route != Route::Home => {
                self.notice = Some("ホーム画面で操作してください".to_string());
            }
            command => {
                let result = self.home_command(command).await;
                self.notice = result.map(|e| e.message);
            }
        }
        Flow::Continue
    }

    async fn navigate(&mut self, route: Route) {
        if route != Route::Home && self.controller.workflow().is_scanning() {
            self.controller.perform(Event::CancelScan).await;
        }
        self.detail = None;
        self.route = route;
    }

    async fn home_command(&mut self, command: Command) -> Option<AppError> {
        let detail_open = self.detail.take().is_some();
        let workflow = self.controller.workflow();
        let has_alert = matches!(workflow.modal(), Some(Modal::Error { .. }));

        let event = match command {
            Command::Scan => Event::StartScan,
            Command::Manual => Event::OpenManualEntry,
            Command::Search(code) => Event::SearchManual(code),
            Command::Add => Event::AddCandidate,
            Command::Buy => Event::PurchaseClicked,
            Command::Yes => Event::ConfirmPurchase,
            Command::Received => Event::ToggleReceived,
            Command::Cancel => match workflow.state() {
                _ if has_alert => Event::DismissAlert,
                WorkflowState::Scanning => Event::CancelScan,
                WorkflowState::ManualEntry => Event::CloseManualEntry,
                WorkflowState::Confirming { .. } => Event::CancelPurchase,
                _ if detail_open => return None,
                _ => Event::CancelScan,
            },
            Command::Ok => match workflow.state() {
                _ if has_alert => Event::DismissAlert,
                WorkflowState::Complete { .. } => Event::DismissReceipt,
                _ if detail_open => return None,
                _ => Event::DismissReceipt,
            },
            Command::Detail(index) => {
                if workflow.modal().is_some() {
                    return Some(AppError::from(CoreError::InvalidTransition {
                        state: workflow.state().name(),
                        event: "detail",
                    }));
                }
                if workflow.purchase_list().get(index).is_none() {
                    return Some(AppError::new(
                        ErrorCode::NotFound,
                        format!("{}番の商品はリストにありません", index + 1),
                    ));
                }
                self.detail = Some(index);
                return None;
            }
            Command::Text(text) => {
                if workflow.is_scanning() {
                    if self.controller.feed_scanner(&text) {
                        return None;
                    }
                    return Some(AppError::new(
                        ErrorCode::CameraError,
                        "スキャナーからの入力を待っています",
                    ));
                }
                if workflow.is_manual_entry() {
                    Event::SearchManual(text)
                } else {
                    return Some(AppError::new(
                        ErrorCode::ValidationError,
                        format!("不明なコマンドです: {} (h でヘルプ)", text),
                    ));
                }
            }
            Command::Navigate(_) | Command::Help | Command::Quit => return None,
        };

        self.controller.perform(event).await
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// The whole screen as text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(RULE);
        out.push('\n');
        out.push_str(&format!(" {}\n", self.title));
        out.push_str(RULE);
        out.push('\n');

        match self.route {
            Route::Home => out.push_str(&home::render(&self.controller, self.detail)),
            Route::History => out.push_str(&history::render()),
            Route::MyPage => out.push_str(&mypage::render()),
        }

        if self.show_help {
            out.push_str(THIN_RULE);
            out.push('\n');
            out.push_str(HELP);
        }

        if let Some(notice) = &self.notice {
            out.push_str(&format!("\n ! {}\n", notice));
        }

        out.push_str(THIN_RULE);
        out.push('\n');
        out.push_str(&self.render_footer());
        out
    }

    fn render_footer(&self) -> String {
        let items: Vec<String> = Route::ALL
            .iter()
            .enumerate()
            .map(|(i, route)| {
                let marker = if *route == self.route { "▶" } else { " " };
                format!("[{}]{}{}", i + 1, marker, route.label())
            })
            .collect();
        format!(" {}\n> ", items.join("  "))
    }
}

const HELP: &str = " s スキャン  c キャンセル  m 手動入力  f <コード> 検索
 a 追加  b 購入  y 購入する  o OK  r 受け取り済
 d <番号> 商品詳細  1/2/3 画面切替  q 終了
";

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::KeyboardWedge;
    use async_trait::async_trait;
    use eventpos_client::{ClientError, ClientResult, PosApi};
    use eventpos_core::{Product, RegisterIdentity, TransactionResult, Yen};
    use std::sync::Arc;

    struct StaticApi;

    #[async_trait]
    impl PosApi for StaticApi {
        async fn lookup_product(&self, code: &str) -> ClientResult<Product> {
            if code == "0000" {
                return Err(ClientError::NotFound {
                    code: code.to_string(),
                });
            }
            Ok(Product {
                id: 1,
                code: code.to_string(),
                name: "DETクリア ピーリングジェリー".to_string(),
                price: Yen::new(1200),
            })
        }

        async fn submit_purchase(
            &self,
            _identity: &RegisterIdentity,
            products: &[Product],
        ) -> ClientResult<TransactionResult> {
            Ok(TransactionResult {
                transaction_id: 7,
                total_amount: products.iter().map(|p| p.price).sum(),
            })
        }
    }

    fn shell() -> Shell {
        let controller = WorkflowController::new(
            Arc::new(StaticApi),
            RegisterIdentity::default(),
            Box::new(KeyboardWedge::new()),
        );
        Shell::new("『イベント名称』専用購入アプリ", controller)
    }

    #[test]
    fn test_command_parsing() {
        assert_eq!(Command::parse(" 2 "), Command::Navigate(Route::History));
        assert_eq!(Command::parse("SCAN"), Command::Scan);
        assert_eq!(
            Command::parse("f 4901234567894"),
            Command::Search("4901234567894".to_string())
        );
        assert_eq!(Command::parse("search"), Command::Search(String::new()));
        assert_eq!(Command::parse("d 2"), Command::Detail(1));
        assert_eq!(Command::parse("d 0"), Command::Text("d 0".to_string()));
        assert_eq!(
            Command::parse("4901234567894"),
            Command::Text("4901234567894".to_string())
        );
    }

    #[test]
    fn test_frame_marks_active_route() {
        let shell = shell();
        let screen = shell.render();
        assert!(screen.contains("『イベント名称』専用購入アプリ"));
        assert!(screen.contains("[1]▶ホーム画面"));
        assert!(screen.contains("[2] 過去購入履歴"));
        assert!(screen.contains("[3] マイページ"));
    }

    #[tokio::test]
    async fn test_navigation_swaps_body() {
        let mut shell = shell();
        shell.handle_line("2").await;
        assert_eq!(shell.route(), Route::History);
        assert!(shell.render().contains("[2]▶過去購入履歴"));
        assert!(shell.render().contains("2025/10/12 15:47"));

        shell.handle_line("3").await;
        assert!(shell.render().contains("田中 太郎"));

        shell.handle_line("scan").await;
        assert_eq!(shell.notice(), Some("ホーム画面で操作してください"));
    }

    #[tokio::test]
    async fn test_leaving_home_stops_scanning() {
        let mut shell = shell();
        shell.handle_line("s").await;
        assert!(shell.controller().has_camera_session());

        shell.handle_line("2").await;
        assert!(!shell.controller().workflow().is_scanning());
        assert!(!shell.controller().has_camera_session());
    }

    #[tokio::test]
    async fn test_manual_entry_purchase_flow() {
        let mut shell = shell();
        shell.handle_line("m").await;
        shell.handle_line("4901234567894").await;
        assert!(shell.render().contains("DETクリア ピーリングジェリー"));

        shell.handle_line("a").await;
        shell.handle_line("b").await;
        assert!(shell.render().contains("合計金額：1,320円 (税込)"));

        shell.handle_line("y").await;
        let screen = shell.render();
        assert!(screen.contains("お買い上げありがとうございます"));
        assert!(screen.contains("お取引 No.7"));

        shell.handle_line("o").await;
        assert!(shell.controller().workflow().purchase_list().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_and_ok_dismiss_error_modal() {
        let mut shell = shell();
        shell.handle_line("b").await;
        assert!(shell.render().contains("商品がリストに追加されていません"));

        shell.handle_line("c").await;
        assert_eq!(shell.controller().workflow().modal(), None);
    }

    #[tokio::test]
    async fn test_detail_view() {
        let mut shell = shell();
        shell.handle_line("d 1").await;
        assert_eq!(
            shell.notice(),
            Some("1番の商品はリストにありません")
        );

        shell.handle_line("m").await;
        shell.handle_line("f 4901234567894").await;
        shell.handle_line("a").await;
        shell.handle_line("d 1").await;

        let screen = shell.render();
        assert!(screen.contains("商品詳細"));
        assert!(screen.contains("バーコード番号: 4901234567894"));

        shell.handle_line("o").await;
        assert!(!shell.render().contains("商品詳細"));
    }

    #[tokio::test]
    async fn test_unknown_text_is_a_notice() {
        let mut shell = shell();
        shell.handle_line("hello").await;
        assert!(shell.notice().unwrap().contains("不明なコマンドです"));
        assert_eq!(shell.handle_line("q").await, Flow::Quit);
    }
}
