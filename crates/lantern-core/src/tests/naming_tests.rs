use crate::naming::able;
use crate::naming::camel_case;
use crate::naming::lc_first;
use crate::naming::snake_case;
use crate::naming::type_name_of;
use crate::naming::uc_first;

#[test]
fn snake_case_splits_words() {
    assert_eq!(snake_case("UserProfile"), "user_profile");
    assert_eq!(snake_case("createdAt"), "created_at");
    assert_eq!(snake_case("authorId"), "author_id");
    assert_eq!(snake_case("already_snake"), "already_snake");
}

#[test]
fn snake_case_keeps_acronyms_together() {
    assert_eq!(snake_case("HTTPServer"), "http_server");
    assert_eq!(snake_case("userID"), "user_id");
    assert_eq!(snake_case("Post2Tag"), "post2_tag");
}

#[test]
fn first_letter_changes() {
    assert_eq!(lc_first("UserProfile"), "userProfile");
    assert_eq!(uc_first("userProfile"), "UserProfile");
    assert_eq!(lc_first(""), "");
    assert_eq!(uc_first(""), "");
}

#[test]
fn camel_case_joins_words() {
    assert_eq!(camel_case("user_profile"), "userProfile");
    assert_eq!(camel_case("post__tag_"), "postTag");
    assert_eq!(camel_case("Plain"), "plain");
}

#[test]
fn discriminators_name_types() {
    assert_eq!(type_name_of("blog_post"), "BlogPost");
    assert_eq!(type_name_of("blogPost"), "BlogPost");
    assert_eq!(type_name_of("post_tag"), "PostTag");
}

#[test]
fn able_forms_polymorphic_names() {
    assert_eq!(able("Comment"), "Commentable");
}
