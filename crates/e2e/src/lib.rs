pub mod context;
pub mod fixtures;
pub mod ops;
pub mod runner;
pub mod specs;
pub mod types;

/// Invoke `$mac!(module::name)` for every E2E spec.
///
/// This is the **single source of truth** for the spec list. Adding a new
/// spec here automatically registers it in `runner::run_all`, the `test`
/// subcommand of the CLI, and `tests/live.rs`.
#[macro_export]
macro_rules! for_each_spec {
    ($mac:ident) => {
        // nodes (6)
        $mac!(nodes::create_node_with_properties);
        $mac!(nodes::user_creates_node_in_own_space);
        $mac!(nodes::update_node_keeps_existing_properties);
        $mac!(nodes::file_node_body_roundtrip);
        $mac!(nodes::delete_removes_node);
        $mac!(nodes::missing_node_is_not_found);

        // versions (2)
        $mac!(versions::save_creates_version);
        $mac!(versions::version_history_freezes_content);

        // users (5)
        $mac!(users::create_user_and_whoami);
        $mac!(users::switching_identity_changes_whoami);
        $mac!(users::update_own_profile_property);
        $mac!(users::user_search_finds_new_account);
        $mac!(users::change_password);

        // groups (2)
        $mac!(groups::create_group_with_member);
        $mac!(groups::add_and_remove_member);

        // authz (4)
        $mac!(authz::read_denied_user_gets_not_found);
        $mac!(authz::write_denied_user_gets_server_error);
        $mac!(authz::everyone_grant_opens_node_to_anonymous);
        $mac!(authz::acl_reflects_modified_ace);

        // pooled content (3)
        $mac!(files::pooled_content_roundtrip);
        $mac!(files::manager_group_reaches_members);
        $mac!(files::nonmember_cannot_list_members);

        // messaging (2)
        $mac!(messages::create_and_send_message);
        $mac!(messages::box_listings_count_messages);

        // contacts (3)
        $mac!(contacts::invite_and_accept);
        $mac!(contacts::reject_invitation);
        $mac!(contacts::concurrent_invitations);

        // sites (3)
        $mac!(sites::create_site_and_read);
        $mac!(sites::site_search_finds_updated_site);
        $mac!(sites::joinable_site_membership);

        // trusted auth (2)
        $mac!(trusted_auth::login_issues_trusted_cookie);
        $mac!(trusted_auth::cookie_rotates_but_session_continues);
    };
}
