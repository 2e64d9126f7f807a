//! HTML Views
//!
//! Minimal server-rendered pages. Deliberately plain: the auth core is the
//! subject of this crate, the views only exist to exercise it. All
//! user-provided values pass through [`escape_html`].

use crate::domain::entity::user::UserProjection;

/// Escape a string for safe interpolation into HTML text and attributes
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <link rel=\"stylesheet\" href=\"/static/style.css\">\n</head>\n<body>\n{body}\n</body>\n</html>\n"
    )
}

fn error_banner(error: Option<&str>) -> String {
    match error {
        Some(msg) => format!("<p class=\"error\">{}</p>\n", escape_html(msg)),
        None => String::new(),
    }
}

/// Home view, with user-or-null context
pub fn home_page(user: Option<&UserProjection>) -> String {
    let body = match user {
        Some(user) => {
            let admin_link = if user.role.is_admin() {
                " | <a href=\"/admin\">Admin</a>"
            } else {
                ""
            };
            format!(
                "<h1>Hello, {}!</h1>\n<p><a href=\"/members\">Members area</a>{}\
                 | <a href=\"/logout\">Log out</a></p>",
                escape_html(&user.name),
                admin_link
            )
        }
        None => "<h1>Welcome</h1>\n<p><a href=\"/signup\">Sign up</a> | <a href=\"/login\">Log in</a></p>"
            .to_string(),
    };
    layout("Home", &body)
}

/// Signup form
pub fn signup_page(error: Option<&str>) -> String {
    let body = format!(
        "<h1>Sign up</h1>\n{}\
         <form method=\"post\" action=\"/signup\">\n\
         <label>Name <input type=\"text\" name=\"name\"></label>\n\
         <label>Email <input type=\"email\" name=\"email\"></label>\n\
         <label>Password <input type=\"password\" name=\"password\"></label>\n\
         <button type=\"submit\">Sign up</button>\n\
         </form>\n<p><a href=\"/login\">Already have an account?</a></p>",
        error_banner(error)
    );
    layout("Sign up", &body)
}

/// Login form; `error` is None on first render
pub fn login_page(error: Option<&str>) -> String {
    let body = format!(
        "<h1>Log in</h1>\n{}\
         <form method=\"post\" action=\"/login\">\n\
         <label>Email <input type=\"email\" name=\"email\"></label>\n\
         <label>Password <input type=\"password\" name=\"password\"></label>\n\
         <button type=\"submit\">Log in</button>\n\
         </form>\n<p><a href=\"/signup\">Create an account</a></p>",
        error_banner(error)
    );
    layout("Log in", &body)
}

/// Members-only gallery view
pub fn members_page(user: &UserProjection, image: &str) -> String {
    let body = format!(
        "<h1>Members area</h1>\n<p>Welcome back, {}.</p>\n\
         <img src=\"/static/{}\" alt=\"gallery\">\n\
         <p><a href=\"/\">Home</a> | <a href=\"/logout\">Log out</a></p>",
        escape_html(&user.name),
        escape_html(image)
    );
    layout("Members", &body)
}

/// Admin view: every user as a row with promote/demote controls
pub fn admin_page(users: &[UserProjection], acting: &UserProjection) -> String {
    let mut rows = String::new();
    for user in users {
        let you = if user.public_id == acting.public_id {
            " (you)"
        } else {
            ""
        };
        rows.push_str(&format!(
            "<tr><td>{name}{you}</td><td>{email}</td><td>{role}</td><td>\n\
             <form method=\"post\" action=\"/admin/update-user\">\n\
             <input type=\"hidden\" name=\"userId\" value=\"{id}\">\n\
             <input type=\"hidden\" name=\"action\" value=\"promote\">\n\
             <button type=\"submit\">Promote</button>\n</form>\n\
             <form method=\"post\" action=\"/admin/update-user\">\n\
             <input type=\"hidden\" name=\"userId\" value=\"{id}\">\n\
             <input type=\"hidden\" name=\"action\" value=\"demote\">\n\
             <button type=\"submit\">Demote</button>\n</form>\n\
             </td></tr>\n",
            name = escape_html(&user.name),
            you = you,
            email = escape_html(&user.email),
            role = user.role,
            id = escape_html(user.public_id.as_str()),
        ));
    }

    let body = format!(
        "<h1>Admin</h1>\n\
         <table>\n<tr><th>Name</th><th>Email</th><th>Role</th><th>Actions</th></tr>\n{rows}</table>\n\
         <p><a href=\"/\">Home</a></p>"
    );
    layout("Admin", &body)
}

/// 403 page for authenticated users lacking the admin role
pub fn forbidden_page() -> String {
    layout(
        "Not authorized",
        "<h1>Not authorized</h1>\n<p>You do not have permission to view this page.</p>\n\
         <p><a href=\"/\">Home</a></p>",
    )
}

/// 404 page
pub fn not_found_page() -> String {
    layout(
        "Not found",
        "<h1>404</h1>\n<p>That page does not exist.</p>\n<p><a href=\"/\">Home</a></p>",
    )
}
