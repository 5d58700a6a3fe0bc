//! Domain values to wire DTOs.

use yatube_core::Page;
use yatube_core::domain::{Author, Group, Post};
use yatube_core::services::{GroupFeed, PostDetail, PostForm, ProfileFeed};
use yatube_shared::dto::{
    AuthorResponse, FeedResponse, GroupFeedResponse, GroupResponse, PageResponse,
    PostDetailResponse, PostFormResponse, PostResponse, ProfileResponse,
};

pub fn author(author: Author) -> AuthorResponse {
    AuthorResponse {
        id: author.id,
        username: author.username,
    }
}

pub fn group(group: Group) -> GroupResponse {
    GroupResponse {
        slug: group.slug,
        title: group.title,
        description: group.description,
    }
}

pub fn post(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        text: post.text,
        author: author(post.author),
        group: post.group,
        pub_date: post.pub_date,
    }
}

pub fn page(page: Page<Post>) -> PageResponse<PostResponse> {
    PageResponse {
        has_next: page.has_next(),
        has_previous: page.has_previous(),
        next_page_number: page.next_page_number(),
        previous_page_number: page.previous_page_number(),
        start_index: page.start_index(),
        end_index: page.end_index(),
        number: page.number,
        total_pages: page.total_pages,
        count: page.count,
        page_size: page.page_size,
        items: page.items.into_iter().map(post).collect(),
    }
}

pub fn feed(posts: Page<Post>) -> FeedResponse {
    FeedResponse { page: page(posts) }
}

pub fn group_feed(feed: GroupFeed) -> GroupFeedResponse {
    GroupFeedResponse {
        group: group(feed.group),
        page: page(feed.page),
    }
}

pub fn profile(feed: ProfileFeed) -> ProfileResponse {
    ProfileResponse {
        author: author(feed.author),
        post_count: feed.post_count,
        page: page(feed.page),
    }
}

pub fn detail(detail: PostDetail) -> PostDetailResponse {
    PostDetailResponse {
        post: post(detail.post),
        group: detail.group.map(group),
        author_post_count: detail.author_post_count,
    }
}

pub fn form(form: PostForm) -> PostFormResponse {
    PostFormResponse {
        is_edit: form.is_edit,
        post: form.post.map(post),
        groups: form.groups.into_iter().map(group).collect(),
    }
}
