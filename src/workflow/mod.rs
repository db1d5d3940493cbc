pub mod article_ctx;
pub mod chat_flow;
pub mod rewrite_flow;

pub use article_ctx::ArticleCtx;
pub use chat_flow::{ChatFlow, ChatReply, ChatTurn};
pub use rewrite_flow::RewriteFlow;
