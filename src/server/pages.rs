//! Server-rendered list and detail pages.

use std::fmt::Write as _;

use crate::filter::{facets, FilterState, SortKey, ALL};
use crate::render::html::{escape, outcome_html, stat_block_html};
use crate::render::{render, render_batch, RenderOptions};
use crate::server::routes::HttpResponse;
use crate::server::AppState;
use crate::session::{
    filter_from_query, filter_to_query, monster_from_query, monster_query, SessionState,
};

const PAGE_TITLE: &str = "モンスター図鑑";
const NO_MATCHES: &str = "該当するモンスターが見つかりませんでした。";
const NOT_FOUND: &str = "指定されたモンスターが見つかりませんでした。";

const SORT_OPTIONS: [(SortKey, &str); 4] = [
    (SortKey::Default, "標準"),
    (SortKey::NameAsc, "名前順"),
    (SortKey::CrAsc, "脅威度（昇順）"),
    (SortKey::CrDesc, "脅威度（降順）"),
];

pub fn index_page(state: &AppState, query: &str) -> HttpResponse {
    let filter = filter_from_query(query);
    match monster_from_query(query) {
        Some(name_jp) => detail_page(state, &name_jp, filter),
        None => list_page(state, &filter),
    }
}

/// Filter query as a suffix for `?monster=` links; empty when nothing is selected.
fn session_suffix(filter: &FilterState) -> String {
    let query = filter_to_query(filter);
    if query.is_empty() {
        query
    } else {
        format!("&{query}")
    }
}

fn list_page(state: &AppState, filter: &FilterState) -> HttpResponse {
    let monsters = crate::filter::apply(state.store.monsters(), filter);
    let mut body = filter_form(state, filter);

    if monsters.is_empty() {
        let _ = writeln!(body, "<p class=\"no-results\">{NO_MATCHES}</p>");
    } else {
        let suffix = session_suffix(filter);
        body.push_str("<div class=\"stat-blocks\">\n");
        for outcome in render_batch(monsters, RenderOptions::default()) {
            body.push_str(&outcome_html(&outcome, &suffix));
        }
        body.push_str("</div>\n");
    }

    HttpResponse::html(200, "OK", layout(PAGE_TITLE, &body))
}

fn filter_form(state: &AppState, filter: &FilterState) -> String {
    let facets = facets(state.store.monsters());
    let mut form = String::from("<form class=\"filters\" method=\"get\" action=\"/\">\n");
    let _ = writeln!(
        form,
        "<input type=\"search\" name=\"q\" placeholder=\"名前で検索\" value=\"{}\">",
        escape(&filter.search_text)
    );

    form.push_str("<select name=\"species\">\n");
    push_option(&mut form, ALL, "すべての種族", filter.species == ALL);
    for species in &facets.species {
        push_option(&mut form, species, species, *species == filter.species);
    }
    form.push_str("</select>\n<select name=\"cr\">\n");
    push_option(&mut form, ALL, "すべての脅威度", filter.challenge_rating == ALL);
    for token in &facets.challenge_ratings {
        push_option(&mut form, token, token, *token == filter.challenge_rating);
    }
    form.push_str("</select>\n<select name=\"sort\">\n");
    for (key, label) in SORT_OPTIONS {
        push_option(&mut form, key.as_str(), label, key == filter.sort_key);
    }
    form.push_str("</select>\n<button type=\"submit\">絞り込み</button>\n</form>\n");
    form
}

fn push_option(out: &mut String, value: &str, label: &str, selected: bool) {
    let _ = writeln!(
        out,
        "<option value=\"{}\"{}>{}</option>",
        escape(value),
        if selected { " selected" } else { "" },
        escape(label)
    );
}

fn detail_page(state: &AppState, name_jp: &str, filter: FilterState) -> HttpResponse {
    let suffix = session_suffix(&filter);
    let back = match filter_to_query(&filter) {
        query if query.is_empty() => "/".to_string(),
        query => format!("/?{query}"),
    };

    let Some(monster) = state.store.find(name_jp) else {
        tracing::debug!(name_jp, "deep link to unknown monster");
        let body = format!(
            "<p class=\"not-found\">{NOT_FOUND}</p>\n<p><a href=\"{}\">一覧に戻る</a></p>\n",
            escape(&back)
        );
        return HttpResponse::html(404, "Not Found", layout(PAGE_TITLE, &body));
    };

    let mut body = String::new();
    let _ = writeln!(
        body,
        "<nav class=\"detail-nav\"><a href=\"{}\">一覧に戻る</a>",
        escape(&back)
    );
    let session = SessionState::capture(state.store.monsters(), filter);
    let (prev, next) = session.neighbors(name_jp);
    if let Some(prev) = prev {
        let _ = write!(
            body,
            " <a class=\"prev\" href=\"/{}{}\">前へ: {}</a>",
            escape(&monster_query(prev)),
            escape(&suffix),
            escape(prev)
        );
    }
    if let Some(next) = next {
        let _ = write!(
            body,
            " <a class=\"next\" href=\"/{}{}\">次へ: {}</a>",
            escape(&monster_query(next)),
            escape(&suffix),
            escape(next)
        );
    }
    body.push_str("</nav>\n");

    match render(monster, RenderOptions { single_view: true }) {
        Ok(block) => body.push_str(&stat_block_html(&block, "")),
        Err(err) => {
            tracing::warn!(error = %err, "skipping stat block");
            body.push_str(&crate::render::html::failure_notice_html(
                name_jp,
                &err.to_string(),
            ));
        }
    }

    let export_path = format!("/api/monsters/{}/export", urlencoding::encode(name_jp));
    let _ = writeln!(
        body,
        "<div class=\"export\"><a href=\"{0}\">ココフォリア用データ</a> \
         <button type=\"button\" class=\"copy-export\" data-export=\"{0}\">コピー</button></div>",
        escape(&export_path)
    );

    HttpResponse::html(200, "OK", layout(&monster.title(), &body))
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"ja\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<link rel=\"stylesheet\" href=\"/assets/style.css\">\n</head>\n\
         <body>\n<h1><a href=\"/\">{PAGE_TITLE}</a></h1>\n{body}\
         <script src=\"/assets/copy.js\" defer></script>\n</body>\n</html>\n",
        escape(title)
    )
}
