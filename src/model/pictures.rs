//! Gallery content. Positions are world x-coordinates of each frame centre.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Picture {
    pub id: u32,
    pub x: f32,
    pub title: &'static str,
    pub description: &'static str,
    pub frame_color: [u8; 3],
    pub accent_color: [u8; 3],
    pub image_path: Option<&'static str>,
    pub video_path: Option<&'static str>,
}

pub static MUSEUM_PICTURES: [Picture; 8] = [
    Picture {
        id: 1,
        x: 550.0,
        title: "Our First Lego",
        description: "This is when bb was super duper into F1. We had mas-mas lego Bintaro to notify us when the new set was released.",
        frame_color: [0x8b, 0x73, 0x55],
        accent_color: [0xd4, 0xa5, 0x74],
        image_path: Some("images/1.jpeg"),
        video_path: Some("videos/1.mp4"),
    },
    Picture {
        id: 2,
        x: 1050.0,
        title: "Our Newest Record",
        description: "Most clubs visited within a year. Can we top it this year. Will Apin get drunk enough to dance like akong? ",
        frame_color: [0x6b, 0x8e, 0x6b],
        accent_color: [0xa8, 0xc9, 0xa8],
        image_path: Some("images/2.jpeg"),
        video_path: Some("videos/2.mp4"),
    },
    Picture {
        id: 3,
        x: 1550.0,
        title: "Our Last Dufan Date(?)",
        description: "We finally got our money worth from dufan's annual pass. Let's go again this year!",
        frame_color: [0x7a, 0x6b, 0x8e],
        accent_color: [0xb8, 0xa8, 0xc9],
        image_path: Some("images/3.jpeg"),
        video_path: Some("videos/3.mp4"),
    },
    Picture {
        id: 4,
        x: 2050.0,
        title: "Our 'First Date'",
        description: "We played walmart bumble, all for some cilok and batagor. It was thrilling though! Let's slip into more parties like this.",
        frame_color: [0x8e, 0x8e, 0x9e],
        accent_color: [0xc9, 0xc9, 0xd9],
        image_path: Some("images/4.jpeg"),
        video_path: Some("videos/4.mp4"),
    },
    Picture {
        id: 5,
        x: 2550.0,
        title: "Our First Moment Living Nearby",
        description: "Our first date after work. We were dirt poor so we had lodeh.",
        frame_color: [0xc9, 0x95, 0x6b],
        accent_color: [0xe8, 0xc4, 0xa8],
        image_path: Some("images/5.jpeg"),
        video_path: None,
    },
    Picture {
        id: 6,
        x: 3050.0,
        title: "Our Quick Bandung Trip",
        description: "Finally went back to Bandung to celebrate christmas with bb.",
        frame_color: [0xa8, 0x7d, 0x5a],
        accent_color: [0xd4, 0xb8, 0x96],
        image_path: Some("images/6.jpeg"),
        video_path: Some("videos/6.mp4"),
    },
    Picture {
        id: 7,
        x: 3550.0,
        title: "Our Hunt for Mala",
        description: "The hunt continues to this day. Which mala resto can finally defeat Paskal's Mala Bowl? Only time will tell.",
        frame_color: [0x7a, 0x9e, 0x7a],
        accent_color: [0xb8, 0xd4, 0xb8],
        image_path: Some("images/7.jpeg"),
        video_path: Some("videos/7.mp4"),
    },
    Picture {
        id: 8,
        x: 4050.0,
        title: "Our First Pilates Together",
        description: "Never in my wildest mind I imagine myself doing pilates. Yet here we are. Menyala kaki ini",
        frame_color: [0x4a, 0x55, 0x68],
        accent_color: [0x88, 0x96, 0xab],
        image_path: Some("images/8.jpeg"),
        video_path: None,
    },
];

const fn secret(
    id: u32,
    x: f32,
    title: &'static str,
    description: &'static str,
    frame_color: [u8; 3],
    accent_color: [u8; 3],
    video_path: &'static str,
) -> Picture {
    Picture {
        id,
        x,
        title,
        description,
        frame_color,
        accent_color,
        image_path: None,
        video_path: Some(video_path),
    }
}

pub static SECRET_PICTURES: [Picture; 10] = [
    secret(101, 400.0, "Secret Memory #1", "A hidden memory waiting to be revealed...", [0x4a, 0x3a, 0x3a], [0x6a, 0x4a, 0x4a], "videos/s1.mp4"),
    secret(102, 800.0, "Secret Memory #2", "Some things are best kept behind locked doors...", [0x3a, 0x3a, 0x4a], [0x4a, 0x4a, 0x6a], "videos/s2.mp4"),
    secret(103, 1200.0, "Secret Memory #3", "The most precious memories are the ones hidden deepest...", [0x3a, 0x4a, 0x3a], [0x4a, 0x6a, 0x4a], "videos/s3.mp4"),
    secret(104, 1600.0, "Secret Memory #4", "You found the secret room. This one's just for us.", [0x4a, 0x3a, 0x4a], [0x6a, 0x4a, 0x6a], "videos/s4.mp4"),
    secret(105, 2000.0, "Secret Memory #5", "Not all treasures are meant to be seen by everyone...", [0x4a, 0x4a, 0x3a], [0x6a, 0x6a, 0x4a], "videos/s5.mp4"),
    secret(106, 2400.0, "Secret Memory #6", "Behind every door lies a story untold...", [0x3a, 0x4a, 0x4a], [0x4a, 0x6a, 0x6a], "videos/s6.mp4"),
    secret(107, 2800.0, "Secret Memory #7", "Whispered moments, louder than words...", [0x4a, 0x3a, 0x3a], [0x7a, 0x5a, 0x5a], "videos/s7.mp4"),
    secret(108, 3200.0, "Secret Memory #8", "The heart remembers what the mind forgets...", [0x3a, 0x3a, 0x3a], [0x5a, 0x5a, 0x5a], "videos/s8.mp4"),
    secret(109, 3600.0, "Secret Memory #9", "Some chapters are written in invisible ink...", [0x4a, 0x3a, 0x4a], [0x6a, 0x5a, 0x6a], "videos/s9.mp4"),
    secret(110, 4000.0, "Secret Memory #10", "The final secret... or is it?", [0x3a, 0x4a, 0x3a], [0x5a, 0x6a, 0x5a], "videos/s10.mp4"),
];

/// Closest picture whose frame is within `radius` of the player
pub fn nearest(pictures: &'static [Picture], player_x: f32, radius: f32) -> Option<&'static Picture> {
    pictures
        .iter()
        .map(|pic| (pic, (player_x - pic.x).abs()))
        .filter(|(_, dist)| *dist < radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(pic, _)| pic)
}

pub fn css_rgb(color: [u8; 3]) -> String {
    format!("rgb({}, {}, {})", color[0], color[1], color[2])
}
