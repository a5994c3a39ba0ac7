//! Home page: register chips, scan / manual entry, code panel, purchase
//! list, and whichever modal the workflow is showing.

use std::fmt::Write;

use eventpos_core::{Modal, Workflow};

use crate::controller::WorkflowController;

const MODAL_TOP: &str = " ┌────────────────────────────────────────────";
const MODAL_BOTTOM: &str = " └────────────────────────────────────────────";

pub(super) fn render(controller: &WorkflowController, detail: Option<usize>) -> String {
    let workflow = controller.workflow();
    let mut out = String::new();

    let chips = controller.identity().status_chips();
    let _ = writeln!(out, " [{}] [{}] [{}]", chips[0], chips[1], chips[2]);
    out.push('\n');

    render_entry(&mut out, workflow);
    out.push('\n');
    render_list(&mut out, workflow);

    if let Some(modal) = workflow.modal() {
        render_modal(&mut out, &modal, &controller.scanner_description());
    } else if let Some(product) = detail.and_then(|i| workflow.purchase_list().get(i)) {
        out.push_str(MODAL_TOP);
        out.push('\n');
        let _ = writeln!(out, " │ 商品詳細");
        let _ = writeln!(out, " │ 商品名: {}", product.name);
        let _ = writeln!(out, " │ バーコード番号: {}", product.code);
        let _ = writeln!(out, " │ 価格: {}", product.price);
        let _ = writeln!(out, " │   o) 閉じる");
        out.push_str(MODAL_BOTTOM);
        out.push('\n');
    }

    out
}

fn render_entry(out: &mut String, workflow: &Workflow) {
    let _ = writeln!(out, "  s) スキャン（カメラ）");
    if workflow.is_manual_entry() {
        let typed = workflow.manual_code();
        let shown = if typed.is_empty() {
            "バーコード番号を入力"
        } else {
            typed
        };
        let _ = writeln!(out, "  [{}]", shown);
        let _ = writeln!(out, "  f <コード>) 検索   c) 閉じる");
    } else {
        let _ = writeln!(out, "  m) 手動で入力する");
    }
    out.push('\n');

    let candidate = workflow.candidate();
    let _ = writeln!(out, "  コード : {}", workflow.code_display());
    let _ = writeln!(
        out,
        "  商品名 : {}",
        candidate.map(|p| p.name.as_str()).unwrap_or("商品名")
    );
    let _ = writeln!(
        out,
        "  単価   : {}",
        candidate
            .map(|p| format!("¥ {}", p.price.grouped()))
            .unwrap_or_else(|| "単価".to_string())
    );

    if let Some(error) = workflow.inline_error() {
        let _ = writeln!(out, "  ※ {}", error);
    }

    let add = if workflow.can_add() {
        "  a) 追加"
    } else {
        "  a) 追加 (-)"
    };
    let _ = writeln!(out, "{}", add);
}

fn render_list(out: &mut String, workflow: &Workflow) {
    let list = workflow.purchase_list();
    let _ = writeln!(out, "  購入リスト                    合計: {}", list.total());

    if list.is_empty() {
        let _ = writeln!(out, "    商品が追加されていません");
    } else {
        for (i, item) in list.entries().iter().enumerate() {
            let _ = writeln!(out, "   {:>2}. {}  x 1  {}", i + 1, item.name, item.price);
        }
    }

    let buy = if workflow.can_purchase() {
        "  b) 購入"
    } else {
        "  b) 購入 (-)"
    };
    let _ = writeln!(out, "{}", buy);
}

fn render_modal(out: &mut String, modal: &Modal, scanner: &str) {
    out.push_str(MODAL_TOP);
    out.push('\n');

    match modal {
        Modal::Scanner => {
            let _ = writeln!(out, " │ バーコードをスキャン");
            let _ = writeln!(out, " │ ({})", scanner);
            let _ = writeln!(out, " │   c) キャンセル");
        }
        Modal::Confirm {
            total_with_tax,
            error,
            submitting,
        } => {
            let _ = writeln!(out, " │ 購入しますか？");
            let _ = writeln!(out, " │ 合計金額：{}円 (税込)", total_with_tax.grouped());
            if let Some(error) = error {
                let _ = writeln!(out, " │ ※ {}", error);
            }
            if *submitting {
                let _ = writeln!(out, " │ 処理中…");
            } else {
                let _ = writeln!(out, " │   c) キャンセル   y) 購入する");
            }
        }
        Modal::Receipt { receipt, received } => {
            let _ = writeln!(out, " │ お買い上げありがとうございます");
            let _ = writeln!(out, " │ お取引 No.{}", receipt.transaction_id);
            let _ = writeln!(
                out,
                " │ 合計金額：{}円 (税込)",
                receipt.total_with_tax().grouped()
            );
            let _ = writeln!(out, " │ こちらの画面をレジで提示し商品をお受け取り下さい");
            let _ = writeln!(out, " │   o) OK");
            let mark = if *received { "x" } else { " " };
            let _ = writeln!(out, " │   r) [{}] 受け取り済", mark);
        }
        Modal::Error { message } => {
            let _ = writeln!(out, " │ エラー");
            let _ = writeln!(out, " │ {}", message);
            let _ = writeln!(out, " │   o) OK");
        }
    }

    out.push_str(MODAL_BOTTOM);
    out.push('\n');
}
