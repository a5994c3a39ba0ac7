//! Member page. Static until the event API exposes member accounts.

use std::fmt::Write;

struct Link {
    title: &'static str,
    subtitle: &'static str,
}

const NAME: &str = "田中 太郎";
const EMAIL: &str = "tanaka.taro@example.com";
const POINTS: &str = "2,450 pt";

const ACCOUNT_LINKS: &[Link] = &[
    Link { title: "プロフィール編集", subtitle: "基本情報の変更" },
    Link { title: "支払い方法", subtitle: "クレジットカード・電子マネー" },
    Link { title: "クーポン・特典", subtitle: "利用可能な特典を確認" },
];

const SETTINGS_LINKS: &[Link] = &[
    Link { title: "通知設定", subtitle: "プッシュ通知・メール設定" },
    Link { title: "言語設定", subtitle: "日本語" },
    Link { title: "ヘルプ・サポート", subtitle: "よくある質問・お問い合わせ" },
];

fn render_links(out: &mut String, heading: &str, links: &[Link]) {
    let _ = writeln!(out, "  {}", heading);
    for link in links {
        let _ = writeln!(out, "    {}  ({})  >", link.title, link.subtitle);
    }
    out.push('\n');
}

pub(super) fn render() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  {}", NAME);
    let _ = writeln!(out, "  {}", EMAIL);
    out.push('\n');
    let _ = writeln!(out, "  保有ポイント  {}", POINTS);
    out.push('\n');

    render_links(&mut out, "アカウント", ACCOUNT_LINKS);
    render_links(&mut out, "設定", SETTINGS_LINKS);

    let _ = writeln!(out, "  ログアウト");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let page = render();
        assert!(page.contains("tanaka.taro@example.com"));
        assert!(page.contains("2,450 pt"));
        assert!(page.contains("言語設定  (日本語)"));
        assert!(page.ends_with("ログアウト\n"));
    }
}
