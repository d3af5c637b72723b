use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::NaiveDateTime;
use clap::Subcommand;

use crate::api::auth::AuthContext;
use crate::api::{admin, blogs, comments};
use crate::client::ApiClient;
use crate::format;
use crate::models::{Blog, BlogStatus, ProfileUpdate};
use crate::routes::{Guard, Route};
use crate::session::SessionStore;
use crate::ui::blog_form::BlogForm;
use crate::ui::browse::{self, BrowseState};
use crate::ui::comment_form::{self, CommentComposer, CommentThread};
use crate::ui::like::{self, LikeState, ToggleOutcome};

/// Everything a command handler needs: the shared session store, the
/// request pipeline, and the auth operations on top of both.
pub struct App {
    pub client: Arc<ApiClient>,
    pub store: Arc<SessionStore>,
    pub auth: AuthContext,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in with email and password
    Login { email: String, password: String },
    /// Create an account and sign in
    Register {
        username: String,
        email: String,
        password: String,
    },
    /// Drop the local session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Update the signed-in user's profile
    Profile {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        avatar: Option<String>,
    },
    /// List blogs with optional search and tag filter
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        tag: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Show one blog with its comments
    Show { id: u64 },
    /// Write a new blog
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Markdown content, inline
        #[arg(long, conflicts_with = "content_file")]
        content: Option<String>,
        /// Read the markdown content from a file
        #[arg(long)]
        content_file: Option<PathBuf>,
        /// Repeatable; at least 2 required, at most 5 kept
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        cover_image: Option<String>,
        #[arg(long, default_value = "published", value_parser = parse_status)]
        status: BlogStatus,
        /// Local date-time for scheduled publication, e.g. 2026-09-01T18:30
        #[arg(long)]
        schedule: Option<String>,
    },
    /// Edit an existing blog
    Edit {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, conflicts_with = "content_file")]
        content: Option<String>,
        #[arg(long)]
        content_file: Option<PathBuf>,
        /// Repeatable; when given, replaces the existing tags
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        cover_image: Option<String>,
        #[arg(long, value_parser = parse_status)]
        status: Option<BlogStatus>,
        #[arg(long)]
        schedule: Option<String>,
    },
    /// Delete a blog
    Delete { id: u64 },
    /// Toggle your like on a blog
    Like { id: u64 },
    /// Comment operations
    #[command(subcommand)]
    Comment(CommentCommand),
    /// Admin dashboard operations
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Subcommand, Debug)]
pub enum CommentCommand {
    /// Add a comment to a blog
    Add { blog_id: u64, content: String },
    /// Delete one of your comments
    Delete { id: u64 },
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// Show dashboard statistics
    Stats,
    /// Download the blog export
    Export {
        /// Destination file
        #[arg(long, default_value = "blogs_export.csv")]
        output: PathBuf,
    },
}

fn parse_status(s: &str) -> Result<BlogStatus, String> {
    s.parse()
}

fn parse_schedule(raw: &str) -> anyhow::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .with_context(|| format!("invalid schedule '{}', expected e.g. 2026-09-01T18:30", raw))
}

pub async fn run(app: &App, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { email, password } => {
            let user = app.auth.login(&email, &password).await?;
            println!("Signed in as {} ({})", user.username, user.role);
        }
        Command::Register {
            username,
            email,
            password,
        } => {
            let user = app.auth.register(&username, &email, &password).await?;
            println!("Welcome, {}!", user.username);
        }
        Command::Logout => {
            app.auth.logout();
            println!("Signed out");
        }
        Command::Whoami => match app.store.current() {
            Some(user) => {
                println!("{} ({})", user.username, user.role);
                if let Some(email) = user.email {
                    println!("{}", email);
                }
            }
            None => println!("Not signed in"),
        },
        Command::Profile {
            username,
            email,
            avatar,
        } => {
            let update = ProfileUpdate {
                username,
                email,
                avatar,
            };
            if update.is_empty() {
                bail!("nothing to update; pass --username, --email or --avatar");
            }
            let user = app.auth.update_profile(&update).await?;
            println!("Profile updated: {}", user.username);
        }
        Command::List {
            search,
            tag,
            page,
            limit,
        } => {
            let mut state = BrowseState::with_cursor(page, limit);
            if let Some(search) = search {
                state.search = search;
            }
            if let Some(tag) = tag {
                state.tag = tag;
            }
            browse::refresh(&mut state, &app.client).await?;

            if state.blogs.is_empty() {
                println!("No blogs found");
            } else {
                for blog in &state.blogs {
                    print_blog_line(blog);
                }
            }
            println!(
                "page {} of {} ({} total)",
                state.pagination.page,
                state.total_pages(),
                state.pagination.total
            );
        }
        Command::Show { id } => {
            let blog = blogs::fetch_blog(&app.client, id).await?;
            print_blog(&blog);
        }
        Command::Create {
            title,
            description,
            content,
            content_file,
            tags,
            cover_image,
            status,
            schedule,
        } => {
            let mut form = BlogForm::new();
            form.title = title;
            form.description = description;
            form.content = read_content(content, content_file)?;
            if let Some(cover) = cover_image {
                form.cover_image = cover;
            }
            form.status = status;
            if let Some(raw) = schedule {
                form.scheduled_at = Some(parse_schedule(&raw)?);
            }
            for tag in &tags {
                if !form.add_tag(tag) {
                    tracing::warn!("tag limit reached, ignoring '{}'", tag);
                }
            }

            let payload = form.payload()?;
            let blog = blogs::create_blog(&app.client, &payload).await?;
            println!("Created blog {} at /blog/{}", blog.id, blog.id);
        }
        Command::Edit {
            id,
            title,
            description,
            content,
            content_file,
            tags,
            cover_image,
            status,
            schedule,
        } => {
            let existing = blogs::fetch_blog(&app.client, id).await?;
            let mut form = BlogForm::from_blog(&existing);
            if let Some(title) = title {
                form.title = title;
            }
            if let Some(description) = description {
                form.description = description;
            }
            if content.is_some() || content_file.is_some() {
                form.content = read_content(content, content_file)?;
            }
            if let Some(cover) = cover_image {
                form.cover_image = cover;
            }
            if let Some(status) = status {
                form.status = status;
            }
            if let Some(raw) = schedule {
                form.scheduled_at = Some(parse_schedule(&raw)?);
            }
            if !tags.is_empty() {
                form.tags.clear();
                for tag in &tags {
                    if !form.add_tag(tag) {
                        tracing::warn!("tag limit reached, ignoring '{}'", tag);
                    }
                }
            }

            let payload = form.payload()?;
            blogs::update_blog(&app.client, id, &payload).await?;
            println!("Updated blog {}", id);
        }
        Command::Delete { id } => {
            blogs::delete_blog(&app.client, id).await?;
            println!("Deleted blog {}", id);
        }
        Command::Like { id } => {
            let blog = blogs::fetch_blog(&app.client, id).await?;
            let mut state = LikeState::from_blog(&blog);
            match like::toggle(&mut state, &app.client, id).await {
                ToggleOutcome::Confirmed => {
                    let verb = if state.is_liked { "Liked" } else { "Unliked" };
                    println!("{} blog {} ({} likes)", verb, id, state.likes);
                }
                ToggleOutcome::Reverted => bail!("Failed to update like"),
                ToggleOutcome::RedirectLogin => bail!("Not signed in; please log in first"),
                ToggleOutcome::Ignored => {}
            }
        }
        Command::Comment(CommentCommand::Add { blog_id, content }) => {
            let blog = blogs::fetch_blog(&app.client, blog_id).await?;
            let mut thread = CommentThread::new(blog.comments, blog.comments_count);
            let mut composer = CommentComposer::new();
            composer.set_draft(content);
            if !composer.can_submit() {
                bail!("comment content must not be empty");
            }
            if comment_form::submit(&mut composer, &mut thread, &app.client, blog_id).await {
                println!("Comment posted ({} comments)", thread.count);
            } else {
                bail!("Failed to create comment");
            }
        }
        Command::Comment(CommentCommand::Delete { id }) => {
            comments::delete_comment(&app.client, id).await?;
            println!("Deleted comment {}", id);
        }
        Command::Admin(cmd) => {
            match Route::Admin.guard(app.store.current().as_ref()) {
                Guard::Allow => {}
                Guard::RedirectLogin => bail!("Not signed in; please log in first"),
                Guard::RedirectHome => bail!("Admin access required"),
            }
            match cmd {
                AdminCommand::Stats => {
                    let (all_blogs, analytics) = tokio::join!(
                        admin::fetch_all_blogs(&app.client),
                        admin::fetch_analytics(&app.client)
                    );
                    let all_blogs = all_blogs?;
                    let analytics = analytics?;

                    let published = all_blogs
                        .iter()
                        .filter(|b| b.status == BlogStatus::Published)
                        .count();
                    let drafts = all_blogs
                        .iter()
                        .filter(|b| b.status == BlogStatus::Draft)
                        .count();

                    println!("Total blogs: {}", analytics.total_blogs);
                    println!("Published:   {}", published);
                    println!("Drafts:      {}", drafts);
                    println!("Total likes: {}", analytics.total_likes);
                }
                AdminCommand::Export { output } => {
                    let bytes = admin::export_csv(&app.client).await?;
                    std::fs::write(&output, &bytes)
                        .with_context(|| format!("writing {}", output.display()))?;
                    println!("Saved export to {}", output.display());
                }
            }
        }
    }
    Ok(())
}

fn read_content(inline: Option<String>, file: Option<PathBuf>) -> anyhow::Result<String> {
    match (inline, file) {
        (Some(content), _) => Ok(content),
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display())),
        (None, None) => Ok(String::new()),
    }
}

fn print_blog_line(blog: &Blog) {
    println!(
        "#{:<5} {:<40} {:<12} {:>3} likes  {}  by {}",
        blog.id,
        truncate(&blog.title, 40),
        blog.status,
        blog.likes_count,
        format::format_full(&blog.created_at),
        blog.author.username,
    );
}

fn print_blog(blog: &Blog) {
    println!("{}", blog.title);
    println!(
        "by {}, {} [{}]",
        blog.author.username,
        format::format_full(&blog.created_at),
        blog.status
    );
    if !blog.tags.is_empty() {
        println!("tags: {}", blog.tags.join(", "));
    }
    println!(
        "{} likes, {} comments",
        blog.likes_count, blog.comments_count
    );
    if !blog.description.is_empty() {
        println!("\n{}", blog.description);
    }
    println!("\n{}", blog.content);

    if !blog.comments.is_empty() {
        println!("\nComments ({}):", blog.comments_count);
        for comment in &blog.comments {
            let who = comment
                .author
                .as_ref()
                .map(|a| a.username.as_str())
                .unwrap_or("Anonymous");
            println!(
                "  {} ({}): {}",
                who,
                format::format_relative(&comment.created_at),
                comment.content
            );
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
