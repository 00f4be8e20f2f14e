//! HTML page rendering
//!
//! Pages are assembled with `format!`; every dynamic value goes through
//! [`escape`], or [`encode_path_segment`] inside URLs.

use axum::http::StatusCode;
use eplayers_common::config::TEAM_IMAGE_DIR;
use eplayers_common::Team;

const STYLE: &str = r#"
        body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; margin: 0; background: #1a1a1a; color: #e0e0e0; }
        header { background: #2a2a2a; border-bottom: 1px solid #3a3a3a; padding: 16px 20px; display: flex; justify-content: space-between; }
        header a { color: #4a9eff; margin-right: 16px; text-decoration: none; }
        main { padding: 20px; }
        table { border-collapse: collapse; margin-bottom: 24px; }
        th, td { border: 1px solid #3a3a3a; padding: 6px 12px; text-align: left; }
        img.team { height: 48px; }
        .flash { color: #ff6b6b; }
"#;

/// Escape text for use in HTML content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode text as one URL path segment, keeping only RFC 3986
/// unreserved bytes as they are
pub fn encode_path_segment(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

fn layout(title: &str, user_name: Option<&str>, body: &str) -> String {
    let account = match user_name {
        Some(name) => format!(
            r#"<span>{}</span> <a href="/Login/Logout">Sair</a>"#,
            escape(name)
        ),
        None => r#"<a href="/Login">Login</a>"#.to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - E-Players</title>
    <style>{STYLE}</style>
</head>
<body>
    <header>
        <nav><a href="/">Home</a><a href="/Equipe">Equipes</a><a href="/Privacy">Privacidade</a></nav>
        <div>{account}</div>
    </header>
    <main>
        <h1>{title}</h1>
{body}
    </main>
</body>
</html>
"#,
        title = escape(title),
        STYLE = STYLE,
        account = account,
        body = body,
    )
}

/// GET /
pub fn home_page(user_name: Option<&str>) -> String {
    let greeting = match user_name {
        Some(name) => format!("<p>Bem-vindo, {}!</p>", escape(name)),
        None => r#"<p>Faça <a href="/Login">login</a> para continuar.</p>"#.to_string(),
    };
    layout("Home", user_name, &greeting)
}

/// GET /Privacy
pub fn privacy_page(user_name: Option<&str>) -> String {
    layout(
        "Privacidade",
        user_name,
        "<p>Os dados de equipes e jogadores ficam armazenados apenas neste servidor.</p>",
    )
}

/// GET /Login
pub fn login_page(flash: Option<&str>) -> String {
    let message = flash
        .map(|m| format!(r#"<p class="flash">{}</p>"#, escape(m)))
        .unwrap_or_default();

    let body = format!(
        r#"{message}
        <form method="post" action="/Login/Logar">
            <label>Email <input type="email" name="Email" required></label>
            <label>Senha <input type="password" name="Senha" required></label>
            <button type="submit">Entrar</button>
        </form>"#
    );
    layout("Login", None, &body)
}

/// GET /Equipe
pub fn teams_page(teams: &[Team], user_name: Option<&str>) -> String {
    let rows: String = teams
        .iter()
        .map(|team| {
            format!(
                r#"
            <tr>
                <td>{id}</td>
                <td>{name}</td>
                <td><img class="team" src="/img/{dir}/{image}" alt="{name}"></td>
                <td><a href="/Equipe/{id}">Excluir</a></td>
            </tr>"#,
                id = team.id,
                name = escape(&team.name),
                dir = TEAM_IMAGE_DIR,
                image = encode_path_segment(&team.image),
            )
        })
        .collect();

    let body = format!(
        r#"
        <table>
            <thead><tr><th>Id</th><th>Nome</th><th>Imagem</th><th></th></tr></thead>
            <tbody>{rows}
            </tbody>
        </table>
        <h2>Cadastrar equipe</h2>
        <form method="post" action="/Equipe/Cadastrar" enctype="multipart/form-data">
            <label>Id <input type="number" name="IdEquipe" required></label>
            <label>Nome <input type="text" name="Nome" required></label>
            <label>Imagem <input type="file" name="Imagem" accept="image/*"></label>
            <button type="submit">Cadastrar</button>
        </form>"#
    );
    layout("Equipes", user_name, &body)
}

/// Unstyled error page
pub fn error_page(status: StatusCode, message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><title>{code}</title></head><body><h1>{code}</h1><p>{message}</p></body></html>\n",
        code = status,
        message = escape(message),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_teams_page_lists_rows() {
        let teams = vec![Team::new(1, "FLA", "fla.png"), Team::new(2, "<COR>", "cor.png")];
        let html = teams_page(&teams, None);

        assert!(html.contains(r#"src="/img/Equipes/fla.png""#));
        assert!(html.contains(r#"<a href="/Equipe/2">Excluir</a>"#));
        assert!(html.contains("&lt;COR&gt;"));
        assert!(!html.contains("<COR>"));
    }

    #[test]
    fn test_image_names_are_url_encoded() {
        assert_eq!(encode_path_segment("time#1.png"), "time%231.png");
        assert_eq!(encode_path_segment("a b?.png"), "a%20b%3F.png");
        assert_eq!(encode_path_segment("ç.png"), "%C3%A7.png");

        let html = teams_page(&[Team::new(1, "FLA", r#"time#1 "x".png"#)], None);
        assert!(html.contains(r#"src="/img/Equipes/time%231%20%22x%22.png""#));
    }

    #[test]
    fn test_login_page_shows_flash() {
        let html = login_page(Some("Dados incorretos, tente novamente..."));
        assert!(html.contains(r#"<p class="flash">Dados incorretos, tente novamente...</p>"#));
        assert!(!login_page(None).contains("class=\"flash\""));
    }

    #[test]
    fn test_home_page_greets_user() {
        assert!(home_page(Some("Gabi")).contains("Bem-vindo, Gabi!"));
        assert!(home_page(None).contains(r#"<a href="/Login">Login</a>"#));
    }

    #[test]
    fn test_error_page_includes_status() {
        let html = error_page(StatusCode::NOT_FOUND, "missing");
        assert!(html.contains("404 Not Found"));
        assert!(html.contains("<p>missing</p>"));
    }
}
