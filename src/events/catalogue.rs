//! The event catalogue
//!
//! One table lists every discriminator the gateway sends together with the
//! payload type it decodes to. [`Event`], [`EventKind`] and the decoder table
//! are all generated from it, so adding an event means adding one line.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use serde_json::Value;

use super::types::*;

type Decoder = fn(Value) -> serde_json::Result<Event>;

macro_rules! event_catalogue {
    ($($variant:ident($payload:ty) => $tag:literal,)*) => {
        /// A decoded gateway event
        #[derive(Debug, Clone)]
        pub enum Event {
            $($variant($payload),)*
            /// Frame from the command stream
            CommandExecuted(CommandExecutedEvent),
            /// Frame with an unregistered discriminator
            Unknown(UnknownEvent),
        }

        /// The subscriber channel an [`Event`] is delivered on
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum EventKind {
            $($variant,)*
            CommandExecuted,
            Unknown,
        }

        impl EventKind {
            /// Every channel, in catalogue order
            pub const ALL: &'static [EventKind] = &[
                $(EventKind::$variant,)*
                EventKind::CommandExecuted,
                EventKind::Unknown,
            ];

            /// The wire discriminator for this kind
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(EventKind::$variant => $tag,)*
                    EventKind::CommandExecuted => "CommandExecuted",
                    EventKind::Unknown => "Unknown",
                }
            }
        }

        impl Event {
            /// The channel this event is delivered on
            pub fn kind(&self) -> EventKind {
                match self {
                    $(Event::$variant(_) => EventKind::$variant,)*
                    Event::CommandExecuted(_) => EventKind::CommandExecuted,
                    Event::Unknown(_) => EventKind::Unknown,
                }
            }
        }

        static DECODERS: LazyLock<HashMap<&'static str, Decoder>> = LazyLock::new(|| {
            let mut table: HashMap<&'static str, Decoder> = HashMap::new();
            $(
                table.insert($tag, |value| {
                    serde_json::from_value::<$payload>(value).map(Event::$variant)
                });
            )*
            table
        });
    };
}

event_catalogue! {
    BotOnline(BotEvent) => "BotOnlineEvent",
    BotOfflineActive(BotEvent) => "BotOfflineEventActive",
    BotOfflineForce(BotEvent) => "BotOfflineEventForce",
    BotOfflineDropped(BotEvent) => "BotOfflineEventDropped",
    BotRelogin(BotEvent) => "BotReloginEvent",
    BotInvitedJoinGroupRequest(GroupRequestEvent) => "BotInvitedJoinGroupRequestEvent",
    FriendMessage(FriendMessageEvent) => "FriendMessage",
    GroupMessage(GroupMessageEvent) => "GroupMessage",
    TempMessage(TempMessageEvent) => "TempMessage",
    GroupRecall(GroupRecallEvent) => "GroupRecallEvent",
    FriendRecall(FriendRecallEvent) => "FriendRecallEvent",
    BotGroupPermissionChange(BotGroupPermissionChangeEvent) => "BotGroupPermissionChangeEvent",
    BotMute(BotMuteEvent) => "BotMuteEvent",
    BotUnmute(BotUnmuteEvent) => "BotUnmuteEvent",
    BotJoinGroup(GroupEvent) => "BotJoinGroupEvent",
    BotLeaveActive(GroupEvent) => "BotLeaveEventActive",
    BotLeaveKick(GroupEvent) => "BotLeaveEventKick",
    GroupNameChange(GroupPropertyChange<String>) => "GroupNameChangeEvent",
    GroupEntranceAnnouncementChange(GroupPropertyChange<String>) => "GroupEntranceAnnouncementChangeEvent",
    GroupMuteAll(GroupPropertyChange<bool>) => "GroupMuteAllEvent",
    GroupAllowAnonymousChat(GroupPropertyChange<bool>) => "GroupAllowAnonymousChatEvent",
    GroupAllowConfessTalk(GroupPropertyChange<bool>) => "GroupAllowConfessTalkEvent",
    GroupAllowMemberInvite(GroupPropertyChange<bool>) => "GroupAllowMemberInviteEvent",
    MemberJoin(MemberEvent) => "MemberJoinEvent",
    MemberLeaveKick(MemberOperatingEvent) => "MemberLeaveEventKick",
    MemberLeaveQuit(MemberEvent) => "MemberLeaveEventQuit",
    MemberCardChange(MemberPropertyChange<String>) => "MemberCardChangeEvent",
    MemberSpecialTitleChange(MemberPropertyChange<String>) => "MemberSpecialTitleChangeEvent",
    MemberPermissionChange(MemberPropertyChange<GroupPermission>) => "MemberPermissionChangeEvent",
    MemberMute(MemberMuteEvent) => "MemberMuteEvent",
    MemberUnmute(MemberUnmuteEvent) => "MemberUnmuteEvent",
    NewFriendRequest(NewFriendRequestEvent) => "NewFriendRequestEvent",
    MemberJoinRequest(GroupRequestEvent) => "MemberJoinRequestEvent",
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(super) fn decoder_for(discriminator: &str) -> Option<Decoder> {
    DECODERS.get(discriminator).copied()
}
